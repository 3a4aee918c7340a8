//! Execution context for collection against a live host or an extracted root

use factgraph_core::broker::Broker;
use factgraph_core::executor::ComponentError;
use factgraph_core::registry::Component;
use factgraph_core::types::{ComponentId, Value};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Filesystem root and hostname every collector resolves against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostContext {
    pub root: PathBuf,
    pub hostname: String,
}

impl HostContext {
    /// Create host context from system information
    pub fn from_system(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            hostname: hostname::get()
                .unwrap_or_else(|_| std::ffi::OsString::from("unknown"))
                .to_string_lossy()
                .to_string(),
        }
    }

    pub fn new(root: impl Into<PathBuf>, hostname: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            hostname: hostname.into(),
        }
    }

    /// True when collecting from `/` rather than an extracted tree
    pub fn is_live(&self) -> bool {
        self.root == Path::new("/")
    }

    /// Resolve an absolute host path under the root
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    /// Read the context back from a broker
    pub fn from_broker(broker: &Broker, id: &ComponentId) -> Result<Self, ComponentError> {
        broker.get_as(id)
    }
}

/// Component producing the host context
pub struct HostContextProvider {
    root: PathBuf,
}

impl HostContextProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Component for HostContextProvider {
    fn invoke(&self, _broker: &Broker) -> Result<Value, ComponentError> {
        Ok(Value::data(&HostContext::from_system(&self.root))?)
    }

    fn describe(&self) -> String {
        format!("host context at {}", self.root.display())
    }
}
