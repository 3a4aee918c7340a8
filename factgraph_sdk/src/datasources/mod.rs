//! # Datasources
//!
//! Producers for specs: files and globs under the host root, allow-listed
//! commands, and computed datasources that reduce sensitive files.

pub mod command;
pub mod files;
pub mod host;
pub mod leapp;

pub use command::{create_command_executor, CommandOutput};
pub use files::{GlobFile, SimpleFile};
pub use host::{HostContext, HostContextProvider};
pub use leapp::{LeappReport, MigrationResults};

use factgraph_core::broker::Broker;
use factgraph_core::executor::ComponentError;
use factgraph_core::log_warning;
use factgraph_core::logging::codes;
use std::path::Path;

/// Component holding the [`HostContext`] every collector depends on
pub const HOST_CONTEXT: &str = "context.host";

pub(crate) fn host_context(broker: &Broker) -> Result<HostContext, ComponentError> {
    HostContext::from_broker(broker, &HOST_CONTEXT.into())
}

/// Read a collected file. Missing or unreadable files do not apply to this
/// host and are skipped; anything else is a content error.
pub(crate) fn read_host_file(path: &Path) -> Result<String, ComponentError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            ComponentError::skip(format!("No such file: {}", path.display()))
        }
        std::io::ErrorKind::PermissionDenied => {
            ComponentError::skip(format!("Permission denied: {}", path.display()))
        }
        _ => {
            log_warning!(
                code = codes::content::CONTENT_UNREADABLE,
                "Collected file could not be read",
                "path" => path.display(),
                "error" => &e
            );
            ComponentError::Content(format!("Failed to read {}: {}", path.display(), e))
        }
    })
}
