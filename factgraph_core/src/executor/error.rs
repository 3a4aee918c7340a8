//! Errors raised by components while the graph executes

use crate::types::ComponentId;

/// Failure reported by a single component invocation
#[derive(Debug, Clone, thiserror::Error)]
pub enum ComponentError {
    /// Component does not apply to this host; not a failure
    #[error("Skipped: {0}")]
    Skip(String),

    /// Collected content could not be read or was malformed
    #[error("Content error: {0}")]
    Content(String),

    /// Parser rejected its input
    #[error("Parse error: {0}")]
    Parse(String),

    /// A dependency value was present but of the wrong shape
    #[error("Dependency '{dependency}' has unexpected value: {reason}")]
    InvalidDependency {
        dependency: ComponentId,
        reason: String,
    },

    /// A dependency the component reads was not resolved
    #[error("Dependency '{0}' was not resolved")]
    MissingDependency(ComponentId),

    #[error("Component failed: {0}")]
    Failed(String),
}

impl ComponentError {
    pub fn skip(reason: impl Into<String>) -> Self {
        Self::Skip(reason.into())
    }

    pub fn content(reason: impl std::fmt::Display) -> Self {
        Self::Content(reason.to_string())
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip(_))
    }

    /// Short label used in tracebacks
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Skip(_) => "Skip",
            Self::Content(_) => "ContentError",
            Self::Parse(_) => "ParseError",
            Self::InvalidDependency { .. } => "InvalidDependency",
            Self::MissingDependency(_) => "MissingDependency",
            Self::Failed(_) => "Failed",
        }
    }
}

impl From<serde_json::Error> for ComponentError {
    fn from(error: serde_json::Error) -> Self {
        Self::Failed(format!("serialization failed: {}", error))
    }
}

/// Failure captured during a run, rendered for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Traceback {
    pub component: ComponentId,
    pub kind: String,
    pub message: String,
}

impl Traceback {
    pub fn from_error(component: &ComponentId, error: &ComponentError) -> Self {
        Self {
            component: component.clone(),
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

impl std::fmt::Display for Traceback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.component, self.message, self.kind)
    }
}
