use reqwest::StatusCode;

/// Failure of a single HTTP download.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("unexpected http status {0}")]
    HttpStatus(StatusCode),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed url: {0}")]
    MalformedUrl(#[from] url::ParseError),
}

/// Failure to read the per-node health of the monitored pool.
#[derive(thiserror::Error, Debug)]
pub enum HealthError {
    #[error(transparent)]
    Network(#[from] FetchError),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("pool not found: {0}")]
    PoolNotFound(String),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("host cannot be empty")]
    EmptyHost,
    #[error("port must be between 1 and 65535")]
    InvalidPort,
    #[error("poll interval must be greater than zero")]
    ZeroInterval,
    #[error("http timeout must be greater than zero")]
    ZeroTimeout,
    #[error("cannot build bootstrap url: {0}")]
    MalformedUrl(#[from] url::ParseError),
}
