use crate::compare::CompareError;
use crate::release::ReleaseError;
use factgraph_core::graph::GraphError;
use factgraph_core::registry::RegistryError;
use factgraph_core::types::ComponentId;

/// Errors raised while building fixtures or driving a component
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("Unknown component: {0}")]
    UnknownComponent(ComponentId),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Comparison failed: {0}")]
    Compare(#[from] CompareError),

    #[error("Release error: {0}")]
    Release(#[from] ReleaseError),
}

impl HarnessError {
    /// Map registry lookups of unknown identifiers onto `UnknownComponent`
    pub(crate) fn from_lookup(error: RegistryError) -> Self {
        match error {
            RegistryError::UnknownComponent(id) => Self::UnknownComponent(id),
            other => Self::Registry(other),
        }
    }
}
