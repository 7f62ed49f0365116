//! Configuration for the pnl-engine binary.
//!
//! YAML with `${VAR}` / `${VAR:-default}` environment interpolation. Every
//! section is optional and falls back to its defaults.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pnl_engine::config::load_config;
//!
//! // config.yaml when present, defaults otherwise
//! let config = load_config(None)?;
//!
//! // an explicit file must exist
//! let config = load_config(Some("custom/config.yaml"))?;
//! ```

mod analytics;
mod observability;
mod tax;

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use analytics::AnalyticsConfig;
pub use observability::{LoggingConfig, ObservabilityConfig};
pub use tax::TaxConfig;

/// File read when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Overview and ratio parameters.
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    /// Tax classification parameters.
    #[serde(default)]
    pub tax: TaxConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Load configuration from a YAML file with environment variable interpolation.
///
/// Without a `path`, [`DEFAULT_CONFIG_PATH`] is read when it exists and the
/// defaults are used otherwise.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => DEFAULT_CONFIG_PATH,
        None => return Ok(Config::default()),
    };

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string.
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax. Unset or empty
/// variables without a default become empty.
#[allow(clippy::expect_used)] // Regex is a compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let rate = config.analytics.risk_free_rate;
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(ConfigError::ValidationError(
            "analytics.risk_free_rate must be between 0 and 1".to_string(),
        ));
    }

    if config.tax.long_term_days <= 0 {
        return Err(ConfigError::ValidationError(
            "tax.long_term_days must be positive".to_string(),
        ));
    }

    for (name, rate) in [
        ("tax.short_term_rate", config.tax.short_term_rate),
        ("tax.long_term_rate", config.tax.long_term_rate),
    ] {
        if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
            return Err(ConfigError::ValidationError(format!(
                "{name} must be between 0 and 100"
            )));
        }
    }

    if config.observability.logging.level.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "observability.logging.level must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.analytics.risk_free_rate, Decimal::ZERO);
        assert!(!config.analytics.strict_marks);
        assert_eq!(config.tax.long_term_days, 365);
        assert_eq!(config.tax.short_term_rate, dec!(15));
        assert_eq!(config.tax.long_term_rate, dec!(10));
        assert_eq!(config.observability.logging.level, "info");
        assert!(config.observability.logging.is_json());
    }

    #[test]
    fn test_load_minimal_config() {
        let yaml = r"
analytics:
  strict_marks: true
";

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load minimal config: {e}"),
        };
        assert!(config.analytics.strict_marks);
        assert_eq!(config.tax, TaxConfig::default());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
analytics:
  risk_free_rate: "0.02"
  strict_marks: false
tax:
  long_term_days: 180
  short_term_rate: 30
  long_term_rate: 12
observability:
  logging:
    level: debug
    format: pretty
"#;

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load full config: {e}"),
        };
        assert_eq!(config.analytics.risk_free_rate, dec!(0.02));
        assert_eq!(config.tax.long_term_days, 180);

        let policy = config.tax.to_policy();
        assert_eq!(policy.short_term_rate, dec!(30));
        assert_eq!(policy.long_term_rate, dec!(12));

        assert_eq!(config.observability.logging.level, "debug");
        assert!(!config.observability.logging.is_json());
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "strict_marks: ${PNL_ENGINE_CONFIG_TEST_NONEXISTENT_VAR:-true}";
        let result = interpolate_env_vars(input);

        assert_eq!(result, "strict_marks: true");
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "level: ${PNL_ENGINE_CONFIG_TEST_UNLIKELY_TO_EXIST}";
        let result = interpolate_env_vars(input);

        assert_eq!(result, "level: ");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax
    fn test_env_var_with_default_uses_existing() {
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);

        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_interpolated_yaml_loads() {
        let yaml = r"
analytics:
  strict_marks: ${PNL_ENGINE_CONFIG_TEST_NONEXISTENT_STRICT:-true}
";
        let Ok(config) = load_config_from_string(yaml) else {
            panic!("interpolated config should load");
        };
        assert!(config.analytics.strict_marks);
    }

    #[test]
    fn test_validation_invalid_risk_free_rate() {
        let yaml = r"
analytics:
  risk_free_rate: 2
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for invalid risk_free_rate");
        };
        assert!(err.to_string().contains("risk_free_rate"));
    }

    #[test]
    fn test_validation_invalid_tax_settings() {
        let Err(err) = load_config_from_string("tax:\n  long_term_days: 0\n") else {
            panic!("expected error for zero threshold");
        };
        assert!(err.to_string().contains("long_term_days"));

        let Err(err) = load_config_from_string("tax:\n  long_term_rate: 150\n") else {
            panic!("expected error for rate above 100");
        };
        assert!(err.to_string().contains("tax.long_term_rate"));
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let result = load_config_from_string("analytics: [unclosed");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = match tempfile::NamedTempFile::new() {
            Ok(f) => f,
            Err(e) => panic!("should create temp file: {e}"),
        };
        if let Err(e) = writeln!(file, "tax:\n  long_term_days: 90") {
            panic!("should write temp file: {e}");
        }

        let Some(path) = file.path().to_str() else {
            panic!("temp path should be valid UTF-8");
        };
        let config = match load_config(Some(path)) {
            Ok(c) => c,
            Err(e) => panic!("should load config file: {e}"),
        };
        assert_eq!(config.tax.long_term_days, 90);
    }

    #[test]
    fn test_missing_explicit_file_is_read_error() {
        let dir = match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("should create temp dir: {e}"),
        };
        let missing = dir.path().join("absent.yaml");
        let Some(path) = missing.to_str() else {
            panic!("temp path should be valid UTF-8");
        };

        let result = load_config(Some(path));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
