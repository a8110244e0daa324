//! Logging configuration and subscriber setup

use crate::error::{StrataError, StrataResult};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), or any `EnvFilter` directive
    pub level: String,
    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Merge with another logging config
    pub fn merge(&mut self, other: LoggingConfig) {
        if !other.level.is_empty() {
            self.level = other.level;
        }

        if !other.format.is_empty() {
            self.format = other.format;
        }
    }

    /// Build the filter, letting `RUST_LOG` win over the configured level
    pub fn env_filter(&self) -> StrataResult<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.level).map_err(|e| {
                StrataError::config_with_context(
                    format!("Invalid log level '{}': {}", self.level, e),
                    "Building log filter",
                )
            }),
        }
    }
}

/// Install a global `tracing` subscriber
///
/// Fails with a config error if a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> StrataResult<()> {
    let filter = config.env_filter()?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match config.format.as_str() {
        "json" => builder.json().try_init(),
        "compact" => builder.compact().try_init(),
        "pretty" => builder.pretty().try_init(),
        other => {
            return Err(StrataError::config(format!(
                "Unknown log format '{}', expected json, pretty or compact",
                other
            )));
        }
    };

    result.map_err(|e| StrataError::config(format!("Failed to initialize logging: {}", e)))
}
