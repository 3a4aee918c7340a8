//! Running components against fixture bundles

use crate::compare::unordered_compare;
use crate::error::HarnessError;
use crate::input_data::InputData;
use crate::release::{DEFAULT_HOSTNAME, DEFAULT_RELEASE};
use factgraph_core::broker::Broker;
use factgraph_core::executor::Executor;
use factgraph_core::logging::codes;
use factgraph_core::types::{Content, ContentRecord, ComponentId, HostMetadata, Value};
use factgraph_core::log_warning;

/// Seed a broker with every fixture entry, run the minimal graph for
/// `component` and return the broker. Captured tracebacks are logged at
/// warning level and never raised.
pub fn run_input_data(component: &ComponentId, input: &InputData) -> Result<Broker, HarnessError> {
    let registry = input.registry();

    let mut broker = Broker::new();
    for (id, value) in input.items() {
        broker.insert(id.clone(), Value::from(value.clone()));
    }

    let graph = registry.dependency_graph(component)?;
    let broker = Executor::new(registry).run(&graph, broker);

    for traceback in broker.tracebacks().values() {
        log_warning!(
            code = codes::execution::TRACEBACK,
            &traceback.to_string(),
            "input" => input.name(),
            "component" => &traceback.component
        );
    }

    Ok(broker)
}

/// Run `component` and, when `expected` is given and not null, compare the
/// result with `unordered_compare`. Returns the component's JSON value.
pub fn run_test(
    component: &ComponentId,
    input: &InputData,
    expected: Option<&serde_json::Value>,
) -> Result<Option<serde_json::Value>, HarnessError> {
    let broker = run_input_data(component, input)?;
    let result = broker.get_json(component);

    if let Some(expected) = expected.filter(|e| !e.is_null()) {
        let actual = result.clone().unwrap_or(serde_json::Value::Null);
        unordered_compare(&actual, expected)?;
    }

    Ok(result)
}

/// `run_test` without an expectation
pub fn integrate(
    input: &InputData,
    component: &ComponentId,
) -> Result<Option<serde_json::Value>, HarnessError> {
    run_test(component, input, None)
}

/// Content record for parser unit tests, carrying default host metadata
pub fn context_wrap(text: &str) -> ContentRecord {
    ContextWrap::new(text).build()
}

/// Builder behind `context_wrap` for overriding the defaults
#[derive(Debug, Clone)]
pub struct ContextWrap {
    lines: Vec<String>,
    path: String,
    hostname: String,
    release: String,
    version: String,
    machine_id: String,
}

impl ContextWrap {
    /// Text is trimmed as a whole, then split into lines
    pub fn new(text: &str) -> Self {
        Self::from_lines(text.trim().lines().map(str::to_string).collect())
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            path: "path".to_string(),
            hostname: DEFAULT_HOSTNAME.to_string(),
            release: DEFAULT_RELEASE.to_string(),
            version: "-1.-1".to_string(),
            machine_id: "machine_id".to_string(),
        }
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn release(mut self, release: impl Into<String>) -> Self {
        self.release = release.into();
        self
    }

    /// Dotted version, stored split on `.`
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn machine_id(mut self, machine_id: impl Into<String>) -> Self {
        self.machine_id = machine_id.into();
        self
    }

    pub fn build(self) -> ContentRecord {
        ContentRecord::new(self.path, Content::Lines(self.lines)).with_host(HostMetadata {
            hostname: self.hostname,
            release: self.release,
            version: self.version.split('.').map(str::to_string).collect(),
            machine_id: self.machine_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::Harness;
    use assert_matches::assert_matches;
    use factgraph_core::executor::ComponentError;
    use factgraph_core::logging::{with_logger, LogLevel, LoggingService, MemoryLogger};
    use factgraph_core::registry::{from_fn, Dependencies, RegistryBuilder};
    use factgraph_core::rules::make_skip;
    use factgraph_core::types::ComponentMetadata;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn harness() -> Harness {
        let registry = RegistryBuilder::new()
            .seeded("specs.hosts", ComponentMetadata::spec())
            .component(
                "parsers.hosts",
                ComponentMetadata::parser(),
                Dependencies::requires(["specs.hosts"]),
                from_fn(|broker| {
                    let record = broker
                        .get_content(&"specs.hosts".into())
                        .ok_or_else(|| ComponentError::MissingDependency("specs.hosts".into()))?;
                    let names: Vec<&str> = record
                        .lines()
                        .into_iter()
                        .filter_map(|l| l.split_whitespace().nth(1))
                        .collect();
                    if names.is_empty() {
                        return Err(ComponentError::Parse("no hosts".to_string()));
                    }
                    Ok(json!({ "names": names }).into())
                }),
            )
            .component(
                "rules.never",
                ComponentMetadata::rule(),
                Dependencies::requires(["parsers.hosts"]),
                from_fn(|_| Ok(make_skip("not applicable"))),
            )
            .build()
            .unwrap();
        Harness::new(registry)
    }

    #[test]
    fn test_run_test_compares_unordered() {
        let harness = harness();
        let mut input = harness.input_data("hosts");
        input
            .add("specs.hosts", "127.0.0.1 localhost\n10.0.0.1 db\n")
            .unwrap();

        let result = harness
            .run_test(
                &"parsers.hosts".into(),
                &input,
                Some(&json!({"names": ["db", "localhost"]})),
            )
            .unwrap();
        assert_eq!(result, Some(json!({"names": ["localhost", "db"]})));

        let mismatch = harness.run_test(
            &"parsers.hosts".into(),
            &input,
            Some(&json!({"names": ["db"]})),
        );
        assert_matches!(mismatch, Err(HarnessError::Compare(_)));
    }

    #[test]
    fn test_skip_with_absent_expectation() {
        let harness = harness();
        let mut input = harness.input_data("skip");
        input.add("specs.hosts", "127.0.0.1 localhost").unwrap();

        let result = harness
            .run_test(&"rules.never".into(), &input, Some(&serde_json::Value::Null))
            .unwrap()
            .unwrap();
        assert!(unordered_compare(&result, &serde_json::Value::Null).is_ok());
    }

    #[test]
    fn test_tracebacks_logged_not_raised() {
        let harness = harness();
        let mut input = harness.input_data("broken");
        input.add("specs.hosts", "").unwrap();

        let memory = Arc::new(MemoryLogger::new());
        let service = Arc::new(LoggingService::new(memory.clone(), LogLevel::Warning));
        let result = with_logger(service, || harness.integrate(&input, &"parsers.hosts".into()));

        assert_eq!(result.unwrap(), None);
        assert_eq!(
            memory.get_events_with_code(codes::execution::TRACEBACK).len(),
            1
        );
    }

    #[test]
    fn test_unknown_component() {
        let harness = harness();
        let input = harness.input_data("unknown");
        assert_matches!(
            run_input_data(&"parsers.nope".into(), &input),
            Err(HarnessError::Graph(_))
        );
    }

    #[test]
    fn test_context_wrap_defaults() {
        let record = context_wrap("\n  first line\nsecond line  \n\n");
        assert_eq!(record.lines(), vec!["first line", "second line"]);
        assert_eq!(record.path, "/path");

        let host = record.host.unwrap();
        assert_eq!(host.hostname, DEFAULT_HOSTNAME);
        assert_eq!(host.release, DEFAULT_RELEASE);
        assert_eq!(host.version, vec!["-1".to_string(), "-1".to_string()]);
        assert_eq!(host.machine_id, "machine_id");
    }

    #[test]
    fn test_context_wrap_overrides() {
        let record = ContextWrap::new("x")
            .path("/proc/net/snmp")
            .version("7.2")
            .hostname("box")
            .build();
        assert_eq!(record.path, "/proc/net/snmp");
        let host = record.host.unwrap();
        assert_eq!(host.version, vec!["7".to_string(), "2".to_string()]);
        assert_eq!(host.hostname, "box");
    }
}
