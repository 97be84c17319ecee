use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use crate::command::common::ClusterArgs;
use crate::core::health::ClusterState;
use crate::core::monitor::{Monitor, StateChanged};

#[derive(Parser, Debug, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub cluster: ClusterArgs,

    /// Print each state change as a JSON line on stdout
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub async fn watch(args: WatchArgs) -> Result<()> {
    let config = args.cluster.to_config();
    let monitor = Monitor::connect(&config)?;

    info!(
        "monitoring pool {} on {}:{}",
        config.pool_name, config.host, config.port
    );

    let mut subscription = monitor.attach();
    monitor.start();

    loop {
        tokio::select! {
            event = subscription.recv() => {
                let Some(event) = event else { break };
                report(&event, args.json)?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    subscription.detach();
    monitor.shutdown().await;

    info!("watch stopped");

    Ok(())
}

fn report(event: &StateChanged, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }

    match event.next {
        ClusterState::Good => info!(console = %event.console_url, "{}", event.summary()),
        _ => warn!(console = %event.console_url, "{}", event.summary()),
    }
    Ok(())
}
