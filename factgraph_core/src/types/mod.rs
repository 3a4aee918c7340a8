pub mod component;
pub mod content;
pub mod value;

pub use component::{Capability, ComponentId, ComponentKind, ComponentMetadata};
pub use content::{normalize_path, Content, ContentRecord, HostMetadata};
pub use value::Value;
