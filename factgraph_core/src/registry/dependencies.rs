//! Declared dependencies of a component

use crate::broker::Broker;
use crate::types::ComponentId;
use serde::Serialize;

/// Typed dependency declaration
///
/// * `requires`: every entry must be resolved
/// * `any_of`: each group needs at least one resolved member
/// * `optional`: resolved when possible, never blocks execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    pub requires: Vec<ComponentId>,
    pub any_of: Vec<Vec<ComponentId>>,
    pub optional: Vec<ComponentId>,
}

impl Dependencies {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn requires<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ComponentId>,
    {
        Self {
            requires: ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_required(mut self, id: impl Into<ComponentId>) -> Self {
        self.requires.push(id.into());
        self
    }

    pub fn with_any_of<I, T>(mut self, group: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ComponentId>,
    {
        self.any_of.push(group.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_optional(mut self, id: impl Into<ComponentId>) -> Self {
        self.optional.push(id.into());
        self
    }

    /// Every component mentioned, required first, without duplicates
    pub fn all(&self) -> Vec<&ComponentId> {
        let mut ids: Vec<&ComponentId> = Vec::new();
        let candidates = self
            .requires
            .iter()
            .chain(self.any_of.iter().flatten())
            .chain(self.optional.iter());
        for id in candidates {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    pub fn is_empty(&self) -> bool {
        self.requires.is_empty() && self.any_of.is_empty() && self.optional.is_empty()
    }

    /// Requirements not met by what the broker currently holds
    pub fn missing(&self, broker: &Broker) -> Option<MissingRequirements> {
        let required: Vec<ComponentId> = self
            .requires
            .iter()
            .filter(|id| !broker.contains(id))
            .cloned()
            .collect();

        let any_of: Vec<Vec<ComponentId>> = self
            .any_of
            .iter()
            .filter(|group| !group.iter().any(|id| broker.contains(id)))
            .cloned()
            .collect();

        if required.is_empty() && any_of.is_empty() {
            None
        } else {
            Some(MissingRequirements { required, any_of })
        }
    }
}

/// Unmet dependencies that kept a component from running
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingRequirements {
    pub required: Vec<ComponentId>,
    pub any_of: Vec<Vec<ComponentId>>,
}

impl std::fmt::Display for MissingRequirements {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<String> = self.required.iter().map(|id| id.to_string()).collect();
        for group in &self.any_of {
            let names: Vec<String> = group.iter().map(|id| id.to_string()).collect();
            parts.push(format!("any of [{}]", names.join(", ")));
        }
        write!(f, "{}", parts.join(", "))
    }
}
