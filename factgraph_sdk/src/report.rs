//! Running targets against the catalogue and reporting the outcome

use factgraph_core::broker::{Broker, BrokerSummary};
use factgraph_core::config::ExecutionPreferences;
use factgraph_core::executor::{Executor, Traceback};
use factgraph_core::graph::GraphError;
use factgraph_core::logging::codes;
use factgraph_core::registry::{ComponentRegistry, MissingRequirements};
use factgraph_core::types::{ComponentId, ComponentKind};
use factgraph_core::{log_success, log_warning};
use serde::Serialize;
use std::collections::BTreeMap;

/// Build the graph for `targets`, run it and log captured tracebacks
pub fn evaluate(
    registry: &ComponentRegistry,
    targets: &[ComponentId],
    prefs: &ExecutionPreferences,
) -> Result<Broker, GraphError> {
    let graph = registry.dependency_graph_for(targets)?;
    log_success!(
        codes::success::GRAPH_BUILT,
        "Dependency graph built",
        "targets" => targets.len(),
        "nodes" => graph.len()
    );

    let broker = Executor::with_preferences(registry, prefs).run(&graph, Broker::new());

    if prefs.log_tracebacks {
        for traceback in broker.tracebacks().values() {
            log_warning!(
                code = codes::execution::TRACEBACK,
                &traceback.to_string(),
                "component" => &traceback.component,
                "kind" => &traceback.kind
            );
        }
    }

    Ok(broker)
}

/// Every rule in the registry, used when no target is named
pub fn default_targets(registry: &ComponentRegistry) -> Vec<ComponentId> {
    registry
        .components_of_kind(ComponentKind::Rule)
        .into_iter()
        .cloned()
        .collect()
}

/// JSON document printed after a run
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub summary: BrokerSummary,
    pub results: BTreeMap<ComponentId, serde_json::Value>,
    pub skipped: BTreeMap<ComponentId, String>,
    pub missing_requirements: BTreeMap<ComponentId, MissingRequirements>,
    pub tracebacks: BTreeMap<ComponentId, Traceback>,
}

impl RunReport {
    /// Results of the requested targets plus every failure in the run
    pub fn from_broker(broker: &Broker, targets: &[ComponentId]) -> Self {
        let results = targets
            .iter()
            .filter_map(|id| broker.get_json(id).map(|value| (id.clone(), value)))
            .collect();

        Self {
            summary: broker.summary(),
            results,
            skipped: broker.skipped().clone(),
            missing_requirements: broker.missing_requirements().clone(),
            tracebacks: broker.tracebacks().clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs::{self, create_registry};
    use factgraph_core::config::CollectionPreferences;
    use factgraph_core::logging::{with_logger, LogLevel, LoggingService, MemoryLogger};
    use std::fs;
    use std::sync::Arc;

    #[test]
    fn test_report_for_extracted_root() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("etc/snmp")).unwrap();
        fs::write(root.path().join("etc/snmp/snmpd.conf"), "# nothing configured\n").unwrap();

        let registry = create_registry(&CollectionPreferences {
            root: root.path().to_path_buf(),
            command_timeout_ms: 5_000,
        })
        .unwrap();
        let targets = default_targets(&registry);
        assert_eq!(
            targets,
            vec![
                ComponentId::new(specs::SNMPD_PUBLIC_COMMUNITY_RULE),
                ComponentId::new(specs::UDP_BUFFER_ERRORS_RULE),
            ]
        );

        let memory = Arc::new(MemoryLogger::new());
        let service = Arc::new(LoggingService::new(memory.clone(), LogLevel::Info));
        let prefs = ExecutionPreferences {
            record_timings: true,
            log_tracebacks: true,
        };
        let broker = with_logger(service, || evaluate(&registry, &targets, &prefs)).unwrap();

        let report = RunReport::from_broker(&broker, &targets);
        assert!(report.results.is_empty());
        assert!(report
            .tracebacks
            .contains_key(&ComponentId::new(specs::SNMPD_CONF_PARSER)));
        assert!(report
            .skipped
            .contains_key(&ComponentId::new(specs::PROC_SNMP_IPV4)));
        assert_eq!(report.missing_requirements.len(), 3);
        assert!(memory.has_event_with_code(codes::execution::TRACEBACK));
        assert!(memory.has_event_with_code(codes::success::GRAPH_BUILT));

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["summary"]["failed"], 1);
    }
}
