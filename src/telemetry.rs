use std::env;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DIRECTIVE: &str = "cluster_health=info";

/// `RUST_LOG` when set, `cluster_health=info` otherwise.
pub fn env_filter(rust_log: Option<&str>) -> EnvFilter {
    match rust_log {
        Some(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new(DEFAULT_DIRECTIVE),
    }
}

/// Install the process-wide tracing subscriber.
pub fn init_telemetry(service_name: &'static str) {
    let rust_log = env::var("RUST_LOG").ok();

    let initialized = tracing_subscriber::registry()
        .with(env_filter(rust_log.as_deref()))
        .with(tracing_subscriber::fmt::layer().compact())
        .try_init();

    if initialized.is_ok() {
        tracing::debug!(service = service_name, "telemetry initialized");
    }
}
