//! Test harness context
//!
//! Owns the registry under test, the placeholder path sequence, the fixture
//! name counters and the archive provider table.

use crate::archive::{ArchiveCase, ArchiveProviders};
use crate::driver;
use crate::error::HarnessError;
use crate::input_data::InputData;
use factgraph_core::broker::Broker;
use factgraph_core::registry::ComponentRegistry;
use factgraph_core::types::ComponentId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Source of unique placeholder paths for fixtures added without one
#[derive(Debug, Default)]
pub struct PathSequence {
    next: AtomicU64,
}

impl PathSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_number(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// `/{n}BOGUS`, unique within this sequence
    pub fn next_placeholder(&self) -> String {
        format!("/{}BOGUS", self.next_number())
    }
}

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Spec seeded by `input_data_with_hostname`
    pub hostname_spec: ComponentId,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            hostname_spec: ComponentId::new("specs.hostname"),
        }
    }
}

pub struct Harness {
    registry: Arc<ComponentRegistry>,
    config: HarnessConfig,
    paths: Arc<PathSequence>,
    names: Mutex<HashMap<String, usize>>,
    archives: ArchiveProviders,
}

impl Harness {
    pub fn new(registry: ComponentRegistry) -> Self {
        Self::with_config(Arc::new(registry), HarnessConfig::default())
    }

    pub fn with_config(registry: Arc<ComponentRegistry>, config: HarnessConfig) -> Self {
        Self {
            registry,
            config,
            paths: Arc::new(PathSequence::new()),
            names: Mutex::new(HashMap::new()),
            archives: ArchiveProviders::new(),
        }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn paths(&self) -> &PathSequence {
        &self.paths
    }

    /// `{name}-{count:05}`, counting per name
    pub fn next_name(&self, name: &str) -> String {
        let mut names = self
            .names
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let count = names.entry(name.to_string()).or_insert(0);
        let numbered = format!("{}-{:05}", name, count);
        *count += 1;
        numbered
    }

    /// Empty fixture bundle
    pub fn input_data(&self, name: &str) -> InputData {
        InputData::new(
            self.next_name(name),
            Arc::clone(&self.registry),
            Arc::clone(&self.paths),
        )
    }

    /// Fixture bundle with the hostname spec already seeded
    pub fn input_data_with_hostname(
        &self,
        name: &str,
        hostname: &str,
    ) -> Result<InputData, HarnessError> {
        let mut input = self.input_data(name);
        input.add(self.config.hostname_spec.clone(), hostname)?;
        Ok(input)
    }

    pub fn run_input_data(
        &self,
        component: &ComponentId,
        input: &InputData,
    ) -> Result<Broker, HarnessError> {
        driver::run_input_data(component, input)
    }

    pub fn run_test(
        &self,
        component: &ComponentId,
        input: &InputData,
        expected: Option<&serde_json::Value>,
    ) -> Result<Option<serde_json::Value>, HarnessError> {
        driver::run_test(component, input, expected)
    }

    pub fn integrate(
        &self,
        input: &InputData,
        component: &ComponentId,
    ) -> Result<Option<serde_json::Value>, HarnessError> {
        driver::integrate(input, component)
    }

    pub fn archives(&self) -> &ArchiveProviders {
        &self.archives
    }

    pub fn archives_mut(&mut self) -> &mut ArchiveProviders {
        &mut self.archives
    }

    /// Every case of every registered provider, at each provider's stride
    pub fn archive_cases(&self) -> impl Iterator<Item = ArchiveCase> + '_ {
        self.archives
            .iter()
            .flat_map(move |provider| provider.cases(self, None))
    }
}
