//! Values held by the broker

use crate::types::content::ContentRecord;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A resolved component value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Single content record from a spec or datasource
    Content(ContentRecord),
    /// Ordered records from a multi-output spec
    ContentList(Vec<ContentRecord>),
    /// Structured output of a parser or rule
    Data(serde_json::Value),
}

impl Value {
    /// Serialize any structured output into a data value
    pub fn data<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Value::Data(serde_json::to_value(value)?))
    }

    pub fn as_content(&self) -> Option<&ContentRecord> {
        match self {
            Value::Content(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_content_list(&self) -> Option<&[ContentRecord]> {
        match self {
            Value::ContentList(records) => Some(records),
            _ => None,
        }
    }

    pub fn as_data(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Data(data) => Some(data),
            _ => None,
        }
    }

    /// Every content record in this value, in order
    pub fn records(&self) -> Vec<&ContentRecord> {
        match self {
            Value::Content(record) => vec![record],
            Value::ContentList(records) => records.iter().collect(),
            Value::Data(_) => Vec::new(),
        }
    }

    /// JSON view used by comparison and reporting
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Data(data) => data.clone(),
            other => serde_json::to_value(other).unwrap_or(serde_json::Value::Null),
        }
    }

    /// Deserialize a data value into a concrete type
    pub fn parse_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_json())
    }
}

impl From<ContentRecord> for Value {
    fn from(record: ContentRecord) -> Self {
        Value::Content(record)
    }
}

impl From<Vec<ContentRecord>> for Value {
    fn from(records: Vec<ContentRecord>) -> Self {
        Value::ContentList(records)
    }
}

impl From<serde_json::Value> for Value {
    fn from(data: serde_json::Value) -> Self {
        Value::Data(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_records_view() {
        let single = Value::from(ContentRecord::raw("/a", "x"));
        assert_eq!(single.records().len(), 1);

        let list = Value::from(vec![
            ContentRecord::raw("/a", "x"),
            ContentRecord::raw("/b", "y"),
        ]);
        assert_eq!(list.records()[1].path, "/b");

        let data = Value::from(serde_json::json!({"a": 1}));
        assert!(data.records().is_empty());
    }

    #[test]
    fn test_data_round_trip_through_serde() {
        let mut map = BTreeMap::new();
        map.insert("DefaultTTL".to_string(), 64i64);
        let value = Value::data(&map).unwrap();
        let back: BTreeMap<String, i64> = value.parse_as().unwrap();
        assert_eq!(back["DefaultTTL"], 64);
    }
}
