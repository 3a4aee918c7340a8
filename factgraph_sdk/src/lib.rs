//! # factgraph SDK
//!
//! Spec catalogue, datasources, SNMP parsers and example rules built on
//! factgraph_core, plus the `factgraph` command line tool.

pub mod datasources;
pub mod parsers;
pub mod report;
pub mod rules;
pub mod specs;

pub use report::{default_targets, evaluate, RunReport};
pub use specs::{create_registry, CatalogueError};
