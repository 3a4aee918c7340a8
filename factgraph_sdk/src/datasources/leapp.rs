//! Leapp upgrade datasources
//!
//! Both source files can hold sensitive data, so only the keys listed here
//! are kept. Output is the reduced JSON as a single content record.

use super::{host_context, read_host_file};
use factgraph_core::broker::Broker;
use factgraph_core::executor::ComponentError;
use factgraph_core::registry::Component;
use factgraph_core::types::{ContentRecord, Value};
use serde_json::{Map, Value as Json};

pub const LEAPP_REPORT_PATH: &str = "/var/log/leapp/leapp-report.json";
pub const MIGRATION_RESULTS_PATH: &str = "/etc/migration-results";

/// Group marking a report entry as blocking the upgrade
const INHIBITOR: &str = "inhibitor";
const INHIBITOR_KEYS: [&str; 3] = ["title", "summary", "detail"];

const ACTIVITY_KEYS: [&str; 9] = [
    "activity",
    "activity_ended",
    "activity_started",
    "env",
    "run_id",
    "source_os",
    "success",
    "target_os",
    "version",
];
const ENV_PREFIXES: [&str; 2] = ["LEAPP_", "CONVERT2RHEL_"];

/// Inhibitor entries of `leapp-report.json`
pub struct LeappReport;

impl Component for LeappReport {
    fn invoke(&self, broker: &Broker) -> Result<Value, ComponentError> {
        let context = host_context(broker)?;
        let text = read_host_file(&context.resolve(LEAPP_REPORT_PATH))?;
        let results = reduce_leapp_report(&text)?;
        provide("factgraph_datasources/leapp_report", results)
    }

    fn describe(&self) -> String {
        "leapp report".to_string()
    }
}

/// Whitelisted activity fields of `/etc/migration-results`
pub struct MigrationResults;

impl Component for MigrationResults {
    fn invoke(&self, broker: &Broker) -> Result<Value, ComponentError> {
        let context = host_context(broker)?;
        let text = read_host_file(&context.resolve(MIGRATION_RESULTS_PATH))?;
        let results = reduce_migration_results(&text)?;
        provide("factgraph_datasources/leapp_migration_results", results)
    }

    fn describe(&self) -> String {
        "leapp migration results".to_string()
    }
}

fn provide(path: &str, results: Vec<Json>) -> Result<Value, ComponentError> {
    // No inhibitors or activities is an expected state of the host, so it
    // is reported as a skip rather than a content failure
    if results.is_empty() {
        return Err(ComponentError::skip("Nothing"));
    }
    let content = serde_json::to_string(&results)?;
    Ok(ContentRecord::raw(path, content).into())
}

fn is_truthy(value: &Json) -> bool {
    match value {
        Json::Null => false,
        Json::Bool(b) => *b,
        Json::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Json::String(s) => !s.is_empty(),
        Json::Array(a) => !a.is_empty(),
        Json::Object(o) => !o.is_empty(),
    }
}

fn parse_document(text: &str) -> Result<Option<Map<String, Json>>, ComponentError> {
    match serde_json::from_str::<Json>(text).map_err(ComponentError::content)? {
        Json::Object(document) => Ok(Some(document)),
        _ => Ok(None),
    }
}

/// Keep report entries whose groups (or legacy flags) mark an inhibitor
pub fn reduce_leapp_report(text: &str) -> Result<Vec<Json>, ComponentError> {
    let Some(document) = parse_document(text)? else {
        return Ok(Vec::new());
    };

    let entries = document
        .get("entries")
        .and_then(Json::as_array)
        .cloned()
        .unwrap_or_default();

    let mut results = Vec::new();
    for entry in entries {
        let groups = entry
            .get("groups")
            .or_else(|| entry.get("flags"))
            .cloned()
            .unwrap_or_else(|| Json::Array(Vec::new()));

        let is_inhibitor = groups
            .as_array()
            .map_or(false, |g| g.iter().any(|v| v.as_str() == Some(INHIBITOR)));
        if !is_inhibitor {
            continue;
        }

        let mut reduced = Map::new();
        reduced.insert("groups".to_string(), groups);
        for key in INHIBITOR_KEYS {
            match entry.get(key) {
                Some(Json::Object(detail)) if !detail.is_empty() => {
                    reduced.extend(detail.clone());
                }
                Some(value) if is_truthy(value) => {
                    reduced.insert(key.to_string(), value.clone());
                }
                _ => {}
            }
        }
        results.push(Json::Object(reduced));
    }

    Ok(results)
}

/// Keep whitelisted activity fields, reducing `env` to leapp variables
pub fn reduce_migration_results(text: &str) -> Result<Vec<Json>, ComponentError> {
    let Some(document) = parse_document(text)? else {
        return Ok(Vec::new());
    };

    let activities = document
        .get("activities")
        .and_then(Json::as_array)
        .cloned()
        .unwrap_or_default();

    let mut results = Vec::new();
    for activity in activities {
        let mut reduced = Map::new();
        for key in ACTIVITY_KEYS {
            let Some(value) = activity.get(key) else {
                continue;
            };

            if key != "env" || !is_truthy(value) {
                reduced.insert(key.to_string(), value.clone());
            } else if let Json::Object(env) = value {
                let kept: Map<String, Json> = env
                    .iter()
                    .filter(|(name, _)| ENV_PREFIXES.iter().any(|p| name.starts_with(p)))
                    .map(|(name, v)| (name.clone(), v.clone()))
                    .collect();
                if !kept.is_empty() {
                    reduced.insert(key.to_string(), Json::Object(kept));
                }
            }
        }

        if !reduced.is_empty() {
            results.push(Json::Object(reduced));
        }
    }

    Ok(results)
}
