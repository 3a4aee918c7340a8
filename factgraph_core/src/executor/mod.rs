//! Graph execution
//!
//! Runs the nodes of a dependency graph in topological order against a
//! broker. Each node's failure is captured in the broker and the run goes on.

pub mod error;

pub use error::{ComponentError, Traceback};

use crate::broker::Broker;
use crate::config::ExecutionPreferences;
use crate::graph::{DependencyGraph, GraphError};
use crate::logging::codes;
use crate::registry::ComponentRegistry;
use crate::types::{Content, ComponentId, Value};
use std::time::Instant;

/// Executes dependency graphs built from one registry
pub struct Executor<'a> {
    registry: &'a ComponentRegistry,
    record_timings: bool,
}

impl<'a> Executor<'a> {
    pub fn new(registry: &'a ComponentRegistry) -> Self {
        Self {
            registry,
            record_timings: true,
        }
    }

    pub fn with_preferences(registry: &'a ComponentRegistry, prefs: &ExecutionPreferences) -> Self {
        Self {
            registry,
            record_timings: prefs.record_timings,
        }
    }

    /// Run every node of `graph`, returning the populated broker
    pub fn run(&self, graph: &DependencyGraph, mut broker: Broker) -> Broker {
        let order = match graph.topological_sort() {
            Ok(order) => order,
            Err(e) => {
                let code = match e {
                    GraphError::CircularDependency { .. } => codes::graph::CIRCULAR_DEPENDENCY,
                    _ => codes::graph::GRAPH_CORRUPTED,
                };
                log_error!(code, &e.to_string());
                return broker;
            }
        };

        log_debug!(
            "Executing dependency graph",
            "run_id" => broker.run_id(),
            "nodes" => order.len()
        );

        for id in &order {
            self.run_node(id, &mut broker);
        }

        let summary = broker.summary();
        log_success!(
            codes::success::RUN_COMPLETED,
            "Dependency graph executed",
            "run_id" => summary.run_id,
            "resolved" => summary.resolved,
            "failed" => summary.failed,
            "skipped" => summary.skipped
        );

        broker
    }

    fn run_node(&self, id: &ComponentId, broker: &mut Broker) {
        // Seeded values are never recomputed
        if broker.contains(id) {
            return;
        }

        let entry = match self.registry.get(id) {
            Ok(entry) => entry,
            Err(e) => {
                broker.add_exception(id, ComponentError::Failed(e.to_string()));
                return;
            }
        };

        if let Some(missing) = entry.dependencies.missing(broker) {
            log_debug!(
                code = codes::execution::MISSING_REQUIREMENTS,
                "Component not run, dependencies unresolved",
                "component" => id,
                "missing" => missing
            );
            broker.add_missing(id, missing);
            return;
        }

        let start = Instant::now();
        let result = entry.producer().invoke(broker);
        if self.record_timings {
            broker.record_exec_time(id, start.elapsed());
        }

        match result {
            Ok(value) => {
                let value = if entry.metadata.filterable {
                    self.filter_value(id, value)
                } else {
                    value
                };
                log_debug!(
                    code = codes::success::COMPONENT_RESOLVED,
                    "Component resolved",
                    "component" => id
                );
                broker.insert(id, value);
            }
            Err(ComponentError::Skip(reason)) => {
                log_debug!(
                    code = codes::execution::COMPONENT_SKIPPED,
                    "Component skipped",
                    "component" => id,
                    "reason" => &reason
                );
                broker.add_skipped(id, reason);
            }
            Err(error) => {
                let code = match error {
                    ComponentError::InvalidDependency { .. } => codes::execution::INVALID_DEPENDENCY,
                    _ => codes::execution::COMPONENT_FAILED,
                };
                log_warning!(
                    code = code,
                    &error.to_string(),
                    "component" => id
                );
                broker.add_exception(id, error);
            }
        }
    }

    /// Reduce line content of filterable components to matching lines
    fn filter_value(&self, id: &ComponentId, value: Value) -> Value {
        let filter = |record: crate::types::ContentRecord| match record.content {
            Content::Lines(lines) => {
                let kept = self
                    .registry
                    .apply_filters(id, lines.clone())
                    .unwrap_or(lines);
                crate::types::ContentRecord {
                    content: Content::Lines(kept),
                    ..record
                }
            }
            Content::Raw(_) => record,
        };

        match value {
            Value::Content(record) => Value::Content(filter(record)),
            Value::ContentList(records) => {
                Value::ContentList(records.into_iter().map(filter).collect())
            }
            data => data,
        }
    }
}

/// Run `graph` against `broker` using `registry`
pub fn run(registry: &ComponentRegistry, graph: &DependencyGraph, broker: Broker) -> Broker {
    Executor::new(registry).run(graph, broker)
}
