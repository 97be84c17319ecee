use anyhow::Result;
use clap::Parser;

use crate::command::common::ClusterArgs;
use crate::core::health::ClusterState;
use crate::core::monitor::Monitor;

#[derive(Parser, Debug, Clone)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub cluster: ClusterArgs,
}

/// Poll once and report the aggregate state.
pub async fn probe(args: ProbeArgs) -> Result<ClusterState> {
    let monitor = Monitor::connect(&args.cluster.to_config())?;
    let state = monitor.poll_once().await;
    println!("{}", state);
    Ok(state)
}
