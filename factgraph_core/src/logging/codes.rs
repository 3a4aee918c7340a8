//! Event codes and their classification metadata
//!
//! Single source of truth for every code the engine logs, with the category,
//! severity and description used by structured output.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Metadata for a code
#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
}

impl CodeMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            description,
        }
    }
}

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Registry and dependency graph codes
pub mod graph {
    use super::Code;

    pub const UNKNOWN_COMPONENT: Code = Code::new("G001");
    pub const CIRCULAR_DEPENDENCY: Code = Code::new("G002");
    pub const GRAPH_CORRUPTED: Code = Code::new("G003");
    pub const REGISTRATION_FAILED: Code = Code::new("G004");
}

/// Execution codes raised while a graph runs
pub mod execution {
    use super::Code;

    pub const COMPONENT_FAILED: Code = Code::new("X001");
    pub const MISSING_REQUIREMENTS: Code = Code::new("X002");
    pub const COMPONENT_SKIPPED: Code = Code::new("X003");
    pub const INVALID_DEPENDENCY: Code = Code::new("X004");
    pub const TRACEBACK: Code = Code::new("X005");
}

/// Collection and parsing codes
pub mod content {
    use super::Code;

    pub const CONTENT_UNREADABLE: Code = Code::new("C001");
    pub const PARSE_FAILED: Code = Code::new("C002");
    pub const COMMAND_FAILED: Code = Code::new("C003");
    pub const COMMAND_TIMEOUT: Code = Code::new("C004");
    pub const COMMAND_REJECTED: Code = Code::new("C005");
}

/// Configuration codes
pub mod config {
    use super::Code;

    pub const CONFIG_INVALID: Code = Code::new("CF001");
    pub const CONFIG_NOT_FOUND: Code = Code::new("CF002");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const GRAPH_BUILT: Code = Code::new("I010");
    pub const RUN_COMPLETED: Code = Code::new("I011");
    pub const COMPONENT_RESOLVED: Code = Code::new("I012");
    pub const COLLECTION_COMPLETE: Code = Code::new("I020");
}

static CODE_REGISTRY: OnceLock<HashMap<&'static str, CodeMetadata>> = OnceLock::new();

fn get_code_registry() -> &'static HashMap<&'static str, CodeMetadata> {
    CODE_REGISTRY.get_or_init(|| {
        let entries = [
            CodeMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                "Critical internal error",
            ),
            CodeMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                "Engine initialization failure",
            ),
            CodeMetadata::new(
                "G001",
                "Graph",
                Severity::High,
                false,
                "Component is not registered",
            ),
            CodeMetadata::new(
                "G002",
                "Graph",
                Severity::High,
                false,
                "Circular dependency between components",
            ),
            CodeMetadata::new(
                "G003",
                "Graph",
                Severity::Critical,
                false,
                "Dependency graph is internally inconsistent",
            ),
            CodeMetadata::new(
                "G004",
                "Graph",
                Severity::High,
                false,
                "Component registration rejected",
            ),
            CodeMetadata::new(
                "X001",
                "Execution",
                Severity::Medium,
                true,
                "Component raised an error; run continued",
            ),
            CodeMetadata::new(
                "X002",
                "Execution",
                Severity::Low,
                true,
                "Component not run because dependencies were unresolved",
            ),
            CodeMetadata::new(
                "X003",
                "Execution",
                Severity::Low,
                true,
                "Component skipped itself",
            ),
            CodeMetadata::new(
                "X004",
                "Execution",
                Severity::Medium,
                true,
                "Dependency value had an unexpected shape",
            ),
            CodeMetadata::new(
                "X005",
                "Execution",
                Severity::Medium,
                true,
                "Captured component traceback",
            ),
            CodeMetadata::new(
                "C001",
                "Content",
                Severity::Medium,
                true,
                "Collected content could not be read",
            ),
            CodeMetadata::new(
                "C002",
                "Content",
                Severity::Medium,
                true,
                "Parser rejected collected content",
            ),
            CodeMetadata::new(
                "C003",
                "Content",
                Severity::Medium,
                true,
                "Command exited unsuccessfully",
            ),
            CodeMetadata::new(
                "C004",
                "Content",
                Severity::Medium,
                true,
                "Command exceeded its timeout",
            ),
            CodeMetadata::new(
                "C005",
                "Content",
                Severity::High,
                true,
                "Command is not on the allow list",
            ),
            CodeMetadata::new(
                "CF001",
                "Config",
                Severity::High,
                false,
                "Configuration could not be parsed",
            ),
            CodeMetadata::new(
                "CF002",
                "Config",
                Severity::High,
                false,
                "Configuration file not found",
            ),
        ];

        entries.into_iter().map(|m| (m.code, m)).collect()
    })
}

/// Get metadata for a specific code
pub fn get_metadata(code: &str) -> Option<&'static CodeMetadata> {
    get_code_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Low)
}

pub fn is_recoverable(code: &str) -> bool {
    get_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn get_description(code: &str) -> &'static str {
    get_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown code")
}

/// Category from the registry, falling back to the code prefix
pub fn get_category(code: &str) -> &'static str {
    if let Some(metadata) = get_metadata(code) {
        return metadata.category;
    }
    match code.chars().next() {
        Some('I') => "Success",
        Some('W') => "Warning",
        Some('D') => "Debug",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_constant_has_metadata() {
        let codes = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            graph::UNKNOWN_COMPONENT,
            graph::CIRCULAR_DEPENDENCY,
            graph::GRAPH_CORRUPTED,
            graph::REGISTRATION_FAILED,
            execution::COMPONENT_FAILED,
            execution::MISSING_REQUIREMENTS,
            execution::COMPONENT_SKIPPED,
            execution::INVALID_DEPENDENCY,
            execution::TRACEBACK,
            content::CONTENT_UNREADABLE,
            content::PARSE_FAILED,
            content::COMMAND_FAILED,
            content::COMMAND_TIMEOUT,
            content::COMMAND_REJECTED,
            config::CONFIG_INVALID,
            config::CONFIG_NOT_FOUND,
        ];
        for code in codes {
            assert!(get_metadata(code.as_str()).is_some(), "{}", code);
        }
    }

    #[test]
    fn test_classification() {
        assert_eq!(get_category("G002"), "Graph");
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert!(is_recoverable("X001"));
        assert_eq!(get_category(success::RUN_COMPLETED.as_str()), "Success");
        assert_eq!(get_description("Z999"), "Unknown code");
    }
}
