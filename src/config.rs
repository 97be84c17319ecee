use std::time::Duration;

use url::Url;

use crate::constants::{
    CONSOLE_PATH, DEFAULT_HOST, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_POOL_NAME, DEFAULT_PORT,
};
use crate::error::ConfigError;
use crate::url_utils::{bootstrap_url, server_url};

/// Settings a monitor is built from. Captured by value: changing any of them means
/// building a new monitor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitorConfig {
    pub host: String,
    pub port: u16,
    pub pool_name: String,
    pub poll_interval: Duration,
    pub http_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            pool_name: DEFAULT_POOL_NAME.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl MonitorConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_pool_name(mut self, pool_name: impl Into<String>) -> Self {
        self.pool_name = pool_name.into();
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_http_timeout(mut self, http_timeout: Duration) -> Self {
        self.http_timeout = http_timeout;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if self.http_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// `http://{host}:{port}/pools`
    pub fn bootstrap_url(&self) -> Result<Url, ConfigError> {
        self.validate()?;
        Ok(bootstrap_url(&self.host, self.port)?)
    }

    /// Web console deep link handed to the presentation layer along with state changes.
    pub fn console_url(&self) -> Result<Url, ConfigError> {
        self.validate()?;
        Ok(server_url(&self.host, self.port, CONSOLE_PATH)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = MonitorConfig::default();
        assert_eq!(cfg.host, "localhost");
        assert_eq!(cfg.port, 8091);
        assert_eq!(cfg.pool_name, "default");
        assert_eq!(cfg.poll_interval, Duration::from_secs(300));
        assert_eq!(
            cfg.bootstrap_url().unwrap().as_str(),
            "http://localhost:8091/pools"
        );
        assert_eq!(
            cfg.console_url().unwrap().as_str(),
            "http://localhost:8091/index.html"
        );
    }

    #[test]
    fn test_validate() {
        assert!(matches!(
            MonitorConfig::new("", 8091).validate(),
            Err(ConfigError::EmptyHost)
        ));
        assert!(matches!(
            MonitorConfig::new("h", 0).validate(),
            Err(ConfigError::InvalidPort)
        ));
        assert!(matches!(
            MonitorConfig::new("h", 8091)
                .with_poll_interval(Duration::ZERO)
                .validate(),
            Err(ConfigError::ZeroInterval)
        ));
        assert!(matches!(
            MonitorConfig::new("h", 8091)
                .with_http_timeout(Duration::ZERO)
                .validate(),
            Err(ConfigError::ZeroTimeout)
        ));
    }

    #[test]
    fn test_malformed_host_fails_url_construction() {
        let cfg = MonitorConfig::new("no such host", 8091);
        assert!(matches!(
            cfg.bootstrap_url(),
            Err(ConfigError::MalformedUrl(_))
        ));
    }
}
