//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Observability configuration (logging only).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `json` for JSON lines, anything else for human-readable output.
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Attach the current span to JSON lines.
    #[serde(default = "default_include_spans")]
    pub include_spans: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            include_spans: default_include_spans(),
        }
    }
}

impl LoggingConfig {
    /// Whether JSON output is selected.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.format.trim().eq_ignore_ascii_case("json")
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

const fn default_include_spans() -> bool {
    true
}
