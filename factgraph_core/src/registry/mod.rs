// src/registry/mod.rs
//! Component registry
//!
//! Associates component identifiers with producers, declared metadata and
//! dependencies, plus the per-component filter patterns applied to content.

pub mod dependencies;
pub mod error;
pub mod filters;
pub mod traits;

pub use dependencies::{Dependencies, MissingRequirements};
pub use error::RegistryError;
pub use filters::FilterSet;
pub use traits::{from_fn, Component, FnComponent, Seeded};

use crate::graph::{DependencyGraph, GraphError};
use crate::types::{Capability, ComponentId, ComponentKind, ComponentMetadata};
use std::collections::HashMap;
use std::sync::Arc;

/// Everything known about one registered component
pub struct RegistryEntry {
    pub id: ComponentId,
    pub metadata: ComponentMetadata,
    pub dependencies: Dependencies,
    producer: Arc<dyn Component>,
}

impl RegistryEntry {
    pub fn producer(&self) -> &dyn Component {
        self.producer.as_ref()
    }
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("id", &self.id)
            .field("metadata", &self.metadata)
            .field("dependencies", &self.dependencies)
            .field("producer", &self.producer.describe())
            .finish()
    }
}

/// Central registry of components
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    entries: HashMap<ComponentId, RegistryEntry>,
    filters: FilterSet,
}

impl ComponentRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component with its metadata, dependencies and producer
    pub fn register(
        &mut self,
        id: impl Into<ComponentId>,
        metadata: ComponentMetadata,
        dependencies: Dependencies,
        producer: impl Component + 'static,
    ) -> Result<(), RegistryError> {
        let id = id.into();

        if self.entries.contains_key(&id) {
            return Err(RegistryError::DuplicateComponent(id));
        }

        if dependencies.all().contains(&&id) {
            return Err(RegistryError::SelfDependency { component: id });
        }

        self.entries.insert(
            id.clone(),
            RegistryEntry {
                id,
                metadata,
                dependencies,
                producer: Arc::new(producer),
            },
        );

        Ok(())
    }

    /// Register a component whose value is only ever seeded into the broker
    pub fn register_seeded(
        &mut self,
        id: impl Into<ComponentId>,
        metadata: ComponentMetadata,
    ) -> Result<(), RegistryError> {
        self.register(id, metadata, Dependencies::none(), Seeded)
    }

    pub fn get(&self, id: &ComponentId) -> Result<&RegistryEntry, RegistryError> {
        self.entries
            .get(id)
            .ok_or_else(|| RegistryError::UnknownComponent(id.clone()))
    }

    pub fn metadata(&self, id: &ComponentId) -> Result<&ComponentMetadata, RegistryError> {
        self.get(id).map(|entry| &entry.metadata)
    }

    /// Raw/multi-output capability lookup
    pub fn capability(&self, id: &ComponentId) -> Result<Capability, RegistryError> {
        self.metadata(id).map(ComponentMetadata::capability)
    }

    pub fn dependencies(&self, id: &ComponentId) -> Result<&Dependencies, RegistryError> {
        self.get(id).map(|entry| &entry.dependencies)
    }

    pub fn contains(&self, id: &ComponentId) -> bool {
        self.entries.contains_key(id)
    }

    /// List registered components, sorted by identifier
    pub fn list_components(&self) -> Vec<&ComponentId> {
        let mut ids: Vec<&ComponentId> = self.entries.keys().collect();
        ids.sort();
        ids
    }

    pub fn components_of_kind(&self, kind: ComponentKind) -> Vec<&ComponentId> {
        let mut ids: Vec<&ComponentId> = self
            .entries
            .values()
            .filter(|entry| entry.metadata.kind == kind)
            .map(|entry| &entry.id)
            .collect();
        ids.sort();
        ids
    }

    /// Register a filter pattern for a filterable component
    pub fn add_filter(
        &mut self,
        id: impl Into<ComponentId>,
        pattern: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let id = id.into();
        let pattern = pattern.into();

        if !self.metadata(&id)?.filterable {
            return Err(RegistryError::NotFilterable(id));
        }
        if pattern.is_empty() {
            return Err(RegistryError::EmptyFilter(id));
        }

        self.filters.add(id, pattern);
        Ok(())
    }

    pub fn filters(&self, id: &ComponentId) -> Vec<&str> {
        self.filters.patterns(id)
    }

    /// Apply the declared filter set for `id` to content lines
    pub fn apply_filters(
        &self,
        id: &ComponentId,
        lines: Vec<String>,
    ) -> Result<Vec<String>, RegistryError> {
        if !self.metadata(id)?.filterable {
            return Ok(lines);
        }
        Ok(self.filters.apply(id, lines))
    }

    /// Minimal dependency graph rooted at `target`
    pub fn dependency_graph(&self, target: &ComponentId) -> Result<DependencyGraph, GraphError> {
        DependencyGraph::for_target(self, target)
    }

    /// Dependency graph covering several targets
    pub fn dependency_graph_for(
        &self,
        targets: &[ComponentId],
    ) -> Result<DependencyGraph, GraphError> {
        DependencyGraph::for_targets(self, targets)
    }

    /// Get registry statistics
    pub fn get_statistics(&self) -> RegistryStatistics {
        let count = |kind: ComponentKind| {
            self.entries
                .values()
                .filter(|e| e.metadata.kind == kind)
                .count()
        };

        RegistryStatistics {
            total_components: self.entries.len(),
            specs: count(ComponentKind::Spec),
            datasources: count(ComponentKind::Datasource),
            parsers: count(ComponentKind::Parser),
            rules: count(ComponentKind::Rule),
            multi_output: self
                .entries
                .values()
                .filter(|e| e.metadata.multi_output)
                .count(),
            filter_patterns: self.filters.len(),
        }
    }
}

/// Registry counts for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RegistryStatistics {
    pub total_components: usize,
    pub specs: usize,
    pub datasources: usize,
    pub parsers: usize,
    pub rules: usize,
    pub multi_output: usize,
    pub filter_patterns: usize,
}

/// Fluent registry construction
pub struct RegistryBuilder {
    registry: ComponentRegistry,
    errors: Vec<RegistryError>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            registry: ComponentRegistry::new(),
            errors: Vec::new(),
        }
    }

    pub fn component(
        mut self,
        id: impl Into<ComponentId>,
        metadata: ComponentMetadata,
        dependencies: Dependencies,
        producer: impl Component + 'static,
    ) -> Self {
        if let Err(e) = self.registry.register(id, metadata, dependencies, producer) {
            self.errors.push(e);
        }
        self
    }

    pub fn seeded(mut self, id: impl Into<ComponentId>, metadata: ComponentMetadata) -> Self {
        if let Err(e) = self.registry.register_seeded(id, metadata) {
            self.errors.push(e);
        }
        self
    }

    pub fn filter(mut self, id: impl Into<ComponentId>, pattern: impl Into<String>) -> Self {
        if let Err(e) = self.registry.add_filter(id, pattern) {
            self.errors.push(e);
        }
        self
    }

    /// Finish construction, reporting the first registration failure
    pub fn build(mut self) -> Result<ComponentRegistry, RegistryError> {
        if self.errors.is_empty() {
            Ok(self.registry)
        } else {
            Err(self.errors.remove(0))
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentRecord, Value};
    use assert_matches::assert_matches;

    fn constant(registry: &mut ComponentRegistry, id: &str) {
        registry
            .register(
                id,
                ComponentMetadata::parser(),
                Dependencies::none(),
                from_fn(|_| Ok(Value::Data(serde_json::json!(1)))),
            )
            .unwrap();
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ComponentRegistry::new();
        constant(&mut registry, "a");
        let result = registry.register_seeded("a", ComponentMetadata::spec());
        assert_matches!(result, Err(RegistryError::DuplicateComponent(_)));
    }

    #[test]
    fn test_self_dependency_rejected() {
        let mut registry = ComponentRegistry::new();
        let result = registry.register(
            "a",
            ComponentMetadata::parser(),
            Dependencies::requires(["a"]),
            Seeded,
        );
        assert_matches!(result, Err(RegistryError::SelfDependency { .. }));
    }

    #[test]
    fn test_capability_lookup() {
        let registry = RegistryBuilder::new()
            .seeded("specs.ls", ComponentMetadata::spec().multi_output())
            .seeded("specs.blob", ComponentMetadata::spec().raw())
            .build()
            .unwrap();

        let ls = registry.capability(&"specs.ls".into()).unwrap();
        assert!(ls.is_multi_output);
        assert!(!ls.is_raw);

        let blob = registry.capability(&"specs.blob".into()).unwrap();
        assert!(blob.is_raw);

        assert_matches!(
            registry.capability(&"specs.nope".into()),
            Err(RegistryError::UnknownComponent(_))
        );
    }

    #[test]
    fn test_filters_require_filterable_component() {
        let mut registry = RegistryBuilder::new()
            .seeded("specs.messages", ComponentMetadata::spec().filterable())
            .seeded("specs.hostname", ComponentMetadata::spec())
            .build()
            .unwrap();

        registry.add_filter("specs.messages", "kernel").unwrap();
        assert_matches!(
            registry.add_filter("specs.hostname", "x"),
            Err(RegistryError::NotFilterable(_))
        );

        let kept = registry
            .apply_filters(
                &"specs.messages".into(),
                vec!["kernel: up".to_string(), "sshd: up".to_string()],
            )
            .unwrap();
        assert_eq!(kept, vec!["kernel: up".to_string()]);

        let untouched = registry
            .apply_filters(&"specs.hostname".into(), vec!["host".to_string()])
            .unwrap();
        assert_eq!(untouched.len(), 1);
    }

    #[test]
    fn test_builder_reports_first_error() {
        let result = RegistryBuilder::new()
            .seeded("a", ComponentMetadata::spec())
            .seeded("a", ComponentMetadata::spec())
            .build();
        assert_matches!(result, Err(RegistryError::DuplicateComponent(_)));
    }

    #[test]
    fn test_statistics() {
        let registry = RegistryBuilder::new()
            .seeded("specs.a", ComponentMetadata::spec().multi_output().filterable())
            .seeded("specs.b", ComponentMetadata::spec())
            .component(
                "parsers.b",
                ComponentMetadata::parser(),
                Dependencies::requires(["specs.b"]),
                from_fn(|broker| {
                    let record: &ContentRecord = broker
                        .get_content(&"specs.b".into())
                        .ok_or_else(|| crate::executor::ComponentError::skip("no b"))?;
                    Ok(Value::Data(serde_json::json!(record.path)))
                }),
            )
            .filter("specs.a", "x")
            .build()
            .unwrap();

        let stats = registry.get_statistics();
        assert_eq!(stats.total_components, 3);
        assert_eq!(stats.specs, 2);
        assert_eq!(stats.parsers, 1);
        assert_eq!(stats.multi_output, 1);
        assert_eq!(stats.filter_patterns, 1);
    }
}
