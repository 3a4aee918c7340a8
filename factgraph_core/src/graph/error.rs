use crate::types::ComponentId;

/// Dependency graph construction and ordering errors
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Unknown component: {0}")]
    UnknownComponent(ComponentId),

    #[error("Component '{required_by}' depends on unknown component '{component}'")]
    UnknownDependency {
        component: ComponentId,
        required_by: ComponentId,
    },

    #[error("Circular dependency detected: {}", format_cycle(.cycle))]
    CircularDependency { cycle: Vec<ComponentId> },

    #[error("Dependency graph corrupted: {details}")]
    DependencyGraphCorrupted { details: String },
}

fn format_cycle(cycle: &[ComponentId]) -> String {
    cycle
        .iter()
        .map(ComponentId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
