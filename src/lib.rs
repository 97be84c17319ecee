pub mod command;
pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod schemas;
pub mod telemetry;
pub mod url_utils;

pub use config::MonitorConfig;
pub use crate::core::health::{ClusterState, NodeState, aggregate};
pub use crate::core::monitor::{Monitor, StateChanged, Subscription};
pub use crate::core::reader::{ClusterHealthReader, HealthSource};
pub use error::{ConfigError, FetchError, HealthError};
