pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8091;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5 * 60;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_POOL_NAME: &str = "default";

pub const BOOTSTRAP_PATH: &str = "/pools";
pub const CONSOLE_PATH: &str = "/index.html";

pub const HEALTHY_STATUS: &str = "healthy";
