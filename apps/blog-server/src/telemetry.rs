//! Telemetry initialization - tracing subscriber setup.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,blog_server=debug,scribe_infra=debug,scribe_core=debug";

/// Telemetry configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Enable JSON logging (for production).
    pub json_logs: bool,
    pub service_name: String,
    pub environment: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            json_logs: false,
            service_name: "blog-server".to_string(),
            environment: "development".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            json_logs: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(defaults.json_logs),
            service_name: defaults.service_name,
            environment: std::env::var("RUST_ENV").unwrap_or(defaults.environment),
        }
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_telemetry(config: &TelemetryConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if config.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }

    tracing::info!(
        service = %config.service_name,
        environment = %config.environment,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );
}
