//! Rule results
//!
//! Rules return one of three outcomes, serialized with a `type` tag so the
//! harness can recognise skips.

use crate::types::Value;
use serde::{Deserialize, Serialize};
use serde_json::Map;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RuleResult {
    /// Condition checked and not present
    Pass {
        pass_key: String,
        #[serde(flatten)]
        details: Map<String, serde_json::Value>,
    },
    /// Condition present on the host
    #[serde(rename = "rule")]
    Fail {
        error_key: String,
        #[serde(flatten)]
        details: Map<String, serde_json::Value>,
    },
    /// Rule did not apply
    Skip {
        reason: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl RuleResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass { .. })
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip { .. })
    }

    pub fn into_value(self) -> Value {
        Value::Data(serde_json::to_value(&self).unwrap_or(serde_json::Value::Null))
    }
}

/// Keys written by the result itself
const RESERVED_KEYS: [&str; 3] = ["type", "error_key", "pass_key"];

/// Flatten object details next to the key. Scalars, and objects using a
/// reserved key, are nested under `details` instead.
fn into_details(details: serde_json::Value) -> Map<String, serde_json::Value> {
    match details {
        serde_json::Value::Null => Map::new(),
        serde_json::Value::Object(map)
            if !RESERVED_KEYS.iter().any(|key| map.contains_key(*key)) =>
        {
            map
        }
        other => {
            let mut map = Map::new();
            map.insert("details".to_string(), other);
            map
        }
    }
}

pub fn make_pass(key: &str, details: serde_json::Value) -> Value {
    RuleResult::Pass {
        pass_key: key.to_string(),
        details: into_details(details),
    }
    .into_value()
}

pub fn make_fail(key: &str, details: serde_json::Value) -> Value {
    RuleResult::Fail {
        error_key: key.to_string(),
        details: into_details(details),
    }
    .into_value()
}

pub fn make_skip(reason: &str) -> Value {
    RuleResult::Skip {
        reason: reason.to_string(),
        details: None,
    }
    .into_value()
}
