use clap::{Parser, Subcommand};

use cluster_health::ClusterState;
use cluster_health::command::probe::{ProbeArgs, probe};
use cluster_health::command::watch::{WatchArgs, watch};
use cluster_health::telemetry::init_telemetry;

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug, Clone)]
enum Cmd {
    /// Poll the cluster and report every change of its health
    Watch(WatchArgs),
    /// Poll the cluster once and print its health
    Probe(ProbeArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_telemetry("cluster-health");

    let args = Args::parse();

    match args.cmd {
        Cmd::Watch(watch_args) => {
            watch(watch_args).await?;
        }
        Cmd::Probe(probe_args) => {
            let state = probe(probe_args).await?;
            if state != ClusterState::Good {
                std::process::exit(2);
            }
        }
    }

    Ok(())
}
