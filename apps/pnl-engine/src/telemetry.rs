//! Tracing subscriber setup.
//!
//! `RUST_LOG` overrides the configured level. JSON lines are emitted when the
//! configured format is `json`, human-readable output otherwise.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pnl_engine::{config::load_config, telemetry::init_telemetry};
//!
//! let config = load_config(None)?;
//! init_telemetry(&config.observability.logging)?;
//! ```

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Error returned when a global subscriber is already installed.
pub type TelemetryError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Install the global subscriber. Logs go to stderr so stdout stays clean.
pub fn init_telemetry(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if config.is_json() {
        builder
            .json()
            .with_current_span(config.include_spans)
            .with_span_list(config.include_spans)
            .try_init()
    } else {
        builder.with_target(false).try_init()
    }
}
