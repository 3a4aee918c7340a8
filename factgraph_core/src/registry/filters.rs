//! Line filters declared per component
//!
//! A filterable component keeps only the lines that contain at least one of
//! its registered patterns. With no patterns registered every line is kept.

use crate::types::ComponentId;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    patterns: HashMap<ComponentId, BTreeSet<String>>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, component: ComponentId, pattern: impl Into<String>) {
        self.patterns
            .entry(component)
            .or_default()
            .insert(pattern.into());
    }

    pub fn patterns(&self, component: &ComponentId) -> Vec<&str> {
        self.patterns
            .get(component)
            .map(|set| set.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn has_patterns(&self, component: &ComponentId) -> bool {
        self.patterns
            .get(component)
            .map_or(false, |set| !set.is_empty())
    }

    /// Keep lines matching any pattern registered for `component`
    pub fn apply<S: AsRef<str>>(&self, component: &ComponentId, lines: Vec<S>) -> Vec<S> {
        match self.patterns.get(component) {
            Some(patterns) if !patterns.is_empty() => lines
                .into_iter()
                .filter(|line| patterns.iter().any(|p| line.as_ref().contains(p.as_str())))
                .collect(),
            _ => lines,
        }
    }

    pub fn len(&self) -> usize {
        self.patterns.values().map(|s| s.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
