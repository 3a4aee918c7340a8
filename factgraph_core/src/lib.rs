//! # factgraph core
//!
//! Component registry, dependency graph, broker and executor for collecting
//! host facts and evaluating rules over them.

#[macro_use]
pub mod logging;
pub mod broker;
pub mod collection;
pub mod config;
pub mod executor;
pub mod graph;
pub mod registry;
pub mod rules;
pub mod types;

pub use broker::{Broker, BrokerSummary};
pub use executor::{run, ComponentError, Executor, Traceback};
pub use graph::{DependencyGraph, GraphError};
pub use registry::{ComponentRegistry, RegistryBuilder, RegistryError};

pub mod prelude {
    pub use crate::broker::Broker;
    pub use crate::config::{ConfigError, EngineConfig};
    pub use crate::executor::{run, ComponentError, Executor, Traceback};
    pub use crate::graph::{DependencyGraph, GraphError};
    pub use crate::registry::{
        from_fn, Component, ComponentRegistry, Dependencies, RegistryBuilder, RegistryError,
    };
    pub use crate::rules::{make_fail, make_pass, make_skip, RuleResult};
    pub use crate::types::{
        Capability, ComponentId, ComponentKind, ComponentMetadata, Content, ContentRecord,
        HostMetadata, Value,
    };
}
