use crate::types::ComponentId;

/// Component registration and lookup errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Unknown component: {0}")]
    UnknownComponent(ComponentId),

    #[error("Component '{0}' is already registered")]
    DuplicateComponent(ComponentId),

    #[error("Component '{0}' does not accept filters")]
    NotFilterable(ComponentId),

    #[error("Filter pattern for '{0}' must not be empty")]
    EmptyFilter(ComponentId),

    #[error("Component '{component}' depends on itself")]
    SelfDependency { component: ComponentId },
}
