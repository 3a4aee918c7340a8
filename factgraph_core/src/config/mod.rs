//! Engine configuration
//!
//! Loaded from TOML; any section or key left out falls back to the
//! `FACTGRAPH_*` environment variables and then to built-in defaults.

pub mod runtime;

pub use runtime::{CollectionPreferences, ExecutionPreferences, LoggingPreferences};

use crate::logging::codes;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub logging: LoggingPreferences,
    pub execution: ExecutionPreferences,
    pub collection: CollectionPreferences,
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| {
            log_error!(
                codes::config::CONFIG_INVALID,
                "Configuration could not be parsed",
                "error" => &e
            );
            ConfigError::Parse(e)
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log_error!(
                codes::config::CONFIG_NOT_FOUND,
                "Configuration file not found",
                "path" => path.display()
            );
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collection.command_timeout_ms == 0 {
            return Err(invalid(
                "collection.command_timeout_ms",
                "must be greater than zero".to_string(),
            ));
        }
        if !self.collection.root.is_absolute() {
            return Err(invalid(
                "collection.root",
                format!("'{}' is not an absolute path", self.collection.root.display()),
            ));
        }
        Ok(())
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.collection.command_timeout_ms)
    }
}

fn invalid(key: &str, reason: String) -> ConfigError {
    log_error!(
        codes::config::CONFIG_INVALID,
        "Invalid configuration value",
        "key" => key,
        "reason" => &reason
    );
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason,
    }
}
