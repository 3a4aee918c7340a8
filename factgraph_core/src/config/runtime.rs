//! Runtime preferences with environment-variable defaults

use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Minimum level emitted
    pub min_level: LogLevel,

    /// Emit one JSON object per event instead of plain text
    pub structured: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            min_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| LogLevel::parse(&v))
                .unwrap_or(LogLevel::Info),
            structured: env::var(env_vars::LOGGING_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionPreferences {
    /// Record per-component execution time in the broker
    pub record_timings: bool,

    /// Log every captured traceback at warning level after a run
    pub log_tracebacks: bool,
}

impl Default for ExecutionPreferences {
    fn default() -> Self {
        Self {
            record_timings: env::var(env_vars::EXECUTION_RECORD_TIMINGS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            log_tracebacks: env::var(env_vars::EXECUTION_LOG_TRACEBACKS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionPreferences {
    /// Filesystem root that collected paths are resolved against
    pub root: PathBuf,

    /// Timeout applied to each collected command
    pub command_timeout_ms: u64,
}

impl Default for CollectionPreferences {
    fn default() -> Self {
        Self {
            root: env::var(env_vars::COLLECTION_ROOT)
                .ok()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/")),
            command_timeout_ms: env::var(env_vars::COLLECTION_COMMAND_TIMEOUT_MS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30_000),
        }
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Logging
    pub const LOGGING_MIN_LEVEL: &str = "FACTGRAPH_LOGGING_MIN_LEVEL";
    pub const LOGGING_STRUCTURED: &str = "FACTGRAPH_LOGGING_STRUCTURED";

    // Execution
    pub const EXECUTION_RECORD_TIMINGS: &str = "FACTGRAPH_EXECUTION_RECORD_TIMINGS";
    pub const EXECUTION_LOG_TRACEBACKS: &str = "FACTGRAPH_EXECUTION_LOG_TRACEBACKS";

    // Collection
    pub const COLLECTION_ROOT: &str = "FACTGRAPH_COLLECTION_ROOT";
    pub const COLLECTION_COMMAND_TIMEOUT_MS: &str = "FACTGRAPH_COLLECTION_COMMAND_TIMEOUT_MS";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_names_are_prefixed() {
        for name in [
            env_vars::LOGGING_MIN_LEVEL,
            env_vars::LOGGING_STRUCTURED,
            env_vars::EXECUTION_RECORD_TIMINGS,
            env_vars::EXECUTION_LOG_TRACEBACKS,
            env_vars::COLLECTION_ROOT,
            env_vars::COLLECTION_COMMAND_TIMEOUT_MS,
        ] {
            assert!(name.starts_with("FACTGRAPH_"));
        }
    }
}
