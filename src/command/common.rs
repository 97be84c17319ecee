use std::time::Duration;

use clap::Args;

use crate::config::MonitorConfig;
use crate::constants::{
    DEFAULT_HOST, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_POOL_NAME,
    DEFAULT_PORT,
};

#[derive(Args, Debug, Clone)]
pub struct ClusterArgs {
    /// Host of any node in the cluster
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// REST port of the cluster
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Name of the pool to monitor
    #[arg(long, default_value = DEFAULT_POOL_NAME)]
    pub pool: String,

    /// Seconds between the end of one poll and the start of the next
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    pub poll_interval_secs: u64,

    /// Per request HTTP timeout (seconds)
    #[arg(long, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub http_timeout_secs: u64,
}

impl ClusterArgs {
    pub fn to_config(&self) -> MonitorConfig {
        MonitorConfig::new(self.host.clone(), self.port)
            .with_pool_name(self.pool.clone())
            .with_poll_interval(Duration::from_secs(self.poll_interval_secs))
            .with_http_timeout(Duration::from_secs(self.http_timeout_secs))
    }
}
