//! Broker: values keyed by component identity, plus the failure side tables
//! filled while a dependency graph runs.

use crate::executor::{ComponentError, Traceback};
use crate::registry::MissingRequirements;
use crate::types::{ComponentId, ContentRecord, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Broker {
    run_id: Uuid,
    values: BTreeMap<ComponentId, Value>,
    tracebacks: BTreeMap<ComponentId, Traceback>,
    exceptions: BTreeMap<ComponentId, Vec<ComponentError>>,
    skipped: BTreeMap<ComponentId, String>,
    missing_requirements: BTreeMap<ComponentId, MissingRequirements>,
    exec_times: BTreeMap<ComponentId, Duration>,
}

impl Broker {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            values: BTreeMap::new(),
            tracebacks: BTreeMap::new(),
            exceptions: BTreeMap::new(),
            skipped: BTreeMap::new(),
            missing_requirements: BTreeMap::new(),
            exec_times: BTreeMap::new(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Store a value, replacing any previous one for `id`
    pub fn insert(&mut self, id: impl Into<ComponentId>, value: impl Into<Value>) {
        self.values.insert(id.into(), value.into());
    }

    pub fn contains(&self, id: &ComponentId) -> bool {
        self.values.contains_key(id)
    }

    pub fn get(&self, id: &ComponentId) -> Option<&Value> {
        self.values.get(id)
    }

    pub fn get_content(&self, id: &ComponentId) -> Option<&ContentRecord> {
        self.get(id).and_then(Value::as_content)
    }

    pub fn get_content_list(&self, id: &ComponentId) -> Option<&[ContentRecord]> {
        self.get(id).and_then(Value::as_content_list)
    }

    /// Typed view of a stored value
    pub fn get_as<T: DeserializeOwned>(&self, id: &ComponentId) -> Result<T, ComponentError> {
        let value = self
            .get(id)
            .ok_or_else(|| ComponentError::MissingDependency(id.clone()))?;
        value
            .parse_as()
            .map_err(|e| ComponentError::InvalidDependency {
                dependency: id.clone(),
                reason: e.to_string(),
            })
    }

    pub fn get_json(&self, id: &ComponentId) -> Option<serde_json::Value> {
        self.get(id).map(Value::to_json)
    }

    /// Identifiers of every stored value, sorted
    pub fn keys(&self) -> impl Iterator<Item = &ComponentId> {
        self.values.keys()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn add_exception(&mut self, id: &ComponentId, error: ComponentError) {
        self.tracebacks
            .insert(id.clone(), Traceback::from_error(id, &error));
        self.exceptions.entry(id.clone()).or_default().push(error);
    }

    pub fn add_skipped(&mut self, id: &ComponentId, reason: impl Into<String>) {
        self.skipped.insert(id.clone(), reason.into());
    }

    pub fn add_missing(&mut self, id: &ComponentId, missing: MissingRequirements) {
        self.missing_requirements.insert(id.clone(), missing);
    }

    pub fn record_exec_time(&mut self, id: &ComponentId, elapsed: Duration) {
        self.exec_times.insert(id.clone(), elapsed);
    }

    pub fn tracebacks(&self) -> &BTreeMap<ComponentId, Traceback> {
        &self.tracebacks
    }

    pub fn traceback(&self, id: &ComponentId) -> Option<&Traceback> {
        self.tracebacks.get(id)
    }

    pub fn exceptions(&self, id: &ComponentId) -> &[ComponentError] {
        self.exceptions.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn skipped(&self) -> &BTreeMap<ComponentId, String> {
        &self.skipped
    }

    pub fn missing_requirements(&self) -> &BTreeMap<ComponentId, MissingRequirements> {
        &self.missing_requirements
    }

    pub fn exec_time(&self, id: &ComponentId) -> Option<Duration> {
        self.exec_times.get(id).copied()
    }

    /// Components that raised a non-skip error
    pub fn failed_components(&self) -> Vec<&ComponentId> {
        self.exceptions.keys().collect()
    }

    pub fn summary(&self) -> BrokerSummary {
        BrokerSummary {
            run_id: self.run_id,
            resolved: self.values.len(),
            failed: self.exceptions.len(),
            skipped: self.skipped.len(),
            missing_requirements: self.missing_requirements.len(),
            total_time: self.exec_times.values().sum(),
        }
    }
}

impl Default for Broker {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts describing one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokerSummary {
    pub run_id: Uuid,
    pub resolved: usize,
    pub failed: usize,
    pub skipped: usize,
    pub missing_requirements: usize,
    #[serde(serialize_with = "serialize_millis")]
    pub total_time: Duration,
}

fn serialize_millis<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u128(value.as_millis())
}

impl std::fmt::Display for BrokerSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "run {}: {} resolved, {} failed, {} skipped, {} missing requirements",
            self.run_id, self.resolved, self.failed, self.skipped, self.missing_requirements
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Counts {
        total: u32,
    }

    #[test]
    fn test_typed_access() {
        let mut broker = Broker::new();
        broker.insert("parsers.counts", serde_json::json!({"total": 3}));

        let counts: Counts = broker.get_as(&"parsers.counts".into()).unwrap();
        assert_eq!(counts, Counts { total: 3 });

        assert_matches!(
            broker.get_as::<Counts>(&"parsers.nope".into()),
            Err(ComponentError::MissingDependency(_))
        );
        assert_matches!(
            broker.get_as::<Vec<String>>(&"parsers.counts".into()),
            Err(ComponentError::InvalidDependency { .. })
        );
    }

    #[test]
    fn test_content_access() {
        let mut broker = Broker::new();
        broker.insert("specs.one", ContentRecord::from_text("/etc/one", "a\nb"));
        broker.insert(
            "specs.many",
            vec![
                ContentRecord::from_text("/x", "1"),
                ContentRecord::from_text("/y", "2"),
            ],
        );

        assert_eq!(broker.get_content(&"specs.one".into()).unwrap().lines(), vec!["a", "b"]);
        assert!(broker.get_content(&"specs.many".into()).is_none());
        assert_eq!(broker.get_content_list(&"specs.many".into()).unwrap().len(), 2);
    }

    #[test]
    fn test_failure_tables() {
        let mut broker = Broker::new();
        let id = ComponentId::new("parsers.bad");
        broker.add_exception(&id, ComponentError::Parse("bad input".to_string()));
        broker.add_skipped(&ComponentId::new("rules.x"), "not applicable");
        broker.record_exec_time(&id, Duration::from_millis(5));

        assert_eq!(broker.failed_components(), vec![&id]);
        assert_eq!(broker.exceptions(&id).len(), 1);
        assert_eq!(broker.traceback(&id).unwrap().kind, "ParseError");

        let summary = broker.summary();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total_time, Duration::from_millis(5));
        assert_eq!(summary.run_id, broker.run_id());
    }
}
