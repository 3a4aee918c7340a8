//! Fixture bundles: canned content records keyed by component

use crate::error::HarnessError;
use crate::harness::PathSequence;
use factgraph_core::registry::ComponentRegistry;
use factgraph_core::types::{Content, ContentRecord, ComponentId, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Content handed to `InputData::add`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureContent {
    Text(String),
    Lines(Vec<String>),
}

impl From<&str> for FixtureContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for FixtureContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<String>> for FixtureContent {
    fn from(lines: Vec<String>) -> Self {
        Self::Lines(lines)
    }
}

impl From<Vec<&str>> for FixtureContent {
    fn from(lines: Vec<&str>) -> Self {
        Self::Lines(lines.into_iter().map(str::to_string).collect())
    }
}

/// Value stored for one component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureValue {
    Single(ContentRecord),
    Multi(Vec<ContentRecord>),
}

impl FixtureValue {
    pub fn records(&self) -> &[ContentRecord] {
        match self {
            Self::Single(record) => std::slice::from_ref(record),
            Self::Multi(records) => records,
        }
    }
}

impl From<FixtureValue> for Value {
    fn from(value: FixtureValue) -> Self {
        match value {
            FixtureValue::Single(record) => Value::Content(record),
            FixtureValue::Multi(records) => Value::ContentList(records),
        }
    }
}

/// Canned input for one test run, shaped like collected data on disk.
///
/// Built through a [`Harness`](crate::Harness), which supplies the registry
/// used for capability and filter lookups plus the placeholder path sequence.
#[derive(Clone)]
pub struct InputData {
    name: String,
    registry: Arc<ComponentRegistry>,
    paths: Arc<PathSequence>,
    data: BTreeMap<ComponentId, FixtureValue>,
}

impl InputData {
    pub(crate) fn new(
        name: String,
        registry: Arc<ComponentRegistry>,
        paths: Arc<PathSequence>,
    ) -> Self {
        Self {
            name,
            registry,
            paths,
            data: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Add content with a generated path, applying filters
    pub fn add(
        &mut self,
        spec: impl Into<ComponentId>,
        content: impl Into<FixtureContent>,
    ) -> Result<&mut Self, HarnessError> {
        self.add_record(spec, content, None, true)
    }

    /// Add content at `path`
    pub fn add_with_path(
        &mut self,
        spec: impl Into<ComponentId>,
        content: impl Into<FixtureContent>,
        path: &str,
    ) -> Result<&mut Self, HarnessError> {
        self.add_record(spec, content, Some(path), true)
    }

    /// Add one record for `spec`.
    ///
    /// Raw specs keep the content untouched. Other content is split into
    /// lines with trailing whitespace trimmed and, when `do_filter` is set,
    /// reduced by the registry's filters. Multi-output specs accumulate
    /// records; any other spec keeps only the latest one.
    pub fn add_record(
        &mut self,
        spec: impl Into<ComponentId>,
        content: impl Into<FixtureContent>,
        path: Option<&str>,
        do_filter: bool,
    ) -> Result<&mut Self, HarnessError> {
        let spec = spec.into();
        let capability = self
            .registry
            .capability(&spec)
            .map_err(HarnessError::from_lookup)?;

        let path = match path {
            Some(path) if !path.is_empty() => path.to_string(),
            _ => self.paths.next_placeholder(),
        };

        let content = if capability.is_raw {
            match content.into() {
                FixtureContent::Text(text) => Content::Raw(text),
                FixtureContent::Lines(lines) => Content::Lines(lines),
            }
        } else {
            let lines = match content.into() {
                FixtureContent::Text(text) => {
                    text.lines().map(|l| l.trim_end().to_string()).collect()
                }
                FixtureContent::Lines(lines) => lines,
            };
            let lines = if do_filter {
                self.registry
                    .apply_filters(&spec, lines)
                    .map_err(HarnessError::from_lookup)?
            } else {
                lines
            };
            Content::Lines(lines)
        };

        let record = ContentRecord::new(path, content);

        if capability.is_multi_output {
            match self
                .data
                .entry(spec)
                .or_insert_with(|| FixtureValue::Multi(Vec::new()))
            {
                FixtureValue::Multi(records) => records.push(record),
                existing => *existing = FixtureValue::Multi(vec![record]),
            }
        } else {
            self.data.insert(spec, FixtureValue::Single(record));
        }

        Ok(self)
    }

    pub fn get(&self, spec: &ComponentId) -> Option<&FixtureValue> {
        self.data.get(spec)
    }

    pub fn contains(&self, spec: &ComponentId) -> bool {
        self.data.contains_key(spec)
    }

    pub fn items(&self) -> impl Iterator<Item = (&ComponentId, &FixtureValue)> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Deep copy under a new name
    pub fn clone_as(&self, name: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.name = name.into();
        copy
    }
}

impl fmt::Display for InputData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<InputData {{name:{}}}>", self.name)
    }
}

impl fmt::Debug for InputData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputData")
            .field("name", &self.name)
            .field("data", &self.data)
            .finish()
    }
}
