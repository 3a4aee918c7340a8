//! Archive providers: generators of (fixture, expected result) pairs
//! registered explicitly on a harness and replayed as test cases.

use crate::compare::{unordered_compare, CompareError};
use crate::driver;
use crate::error::HarnessError;
use crate::harness::Harness;
use crate::input_data::InputData;
use factgraph_core::types::ComponentId;

/// Checks a result against its expectation
pub type Comparator = fn(&serde_json::Value, &serde_json::Value) -> Result<(), CompareError>;

/// One generated fixture with its expected result
pub type GeneratedCase = (InputData, Option<serde_json::Value>);

/// Lazy sequence of generated cases, borrowing the harness that builds them
pub type CaseIter<'a> = Box<dyn Iterator<Item = GeneratedCase> + 'a>;

type Generator = Box<dyn for<'a> Fn(&'a Harness) -> CaseIter<'a> + Send + Sync>;

pub struct ArchiveProvider {
    component: ComponentId,
    comparator: Comparator,
    stride: usize,
    generator: Generator,
}

impl ArchiveProvider {
    pub fn component(&self) -> &ComponentId {
        &self.component
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Fresh iterator over every `stride`-th generated case.
    /// `None` uses the stride given at registration. Fixtures are built
    /// only as the iterator is advanced.
    pub fn cases<'a>(
        &'a self,
        harness: &'a Harness,
        stride: Option<usize>,
    ) -> impl Iterator<Item = ArchiveCase> + 'a {
        let stride = stride.unwrap_or(self.stride).max(1);
        (self.generator)(harness)
            .step_by(stride)
            .map(move |(input, expected)| ArchiveCase {
                component: self.component.clone(),
                comparator: self.comparator,
                input,
                expected,
            })
    }
}

/// Harness-owned table of archive providers
#[derive(Default)]
pub struct ArchiveProviders {
    providers: Vec<ArchiveProvider>,
}

impl ArchiveProviders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a generator for `component`
    pub fn register<F>(
        &mut self,
        component: impl Into<ComponentId>,
        comparator: Comparator,
        stride: usize,
        generator: F,
    ) -> &mut Self
    where
        F: for<'a> Fn(&'a Harness) -> CaseIter<'a> + Send + Sync + 'static,
    {
        self.providers.push(ArchiveProvider {
            component: component.into(),
            comparator,
            stride: stride.max(1),
            generator: Box::new(generator),
        });
        self
    }

    /// Register with `unordered_compare` and stride 1
    pub fn register_default<F>(&mut self, component: impl Into<ComponentId>, generator: F) -> &mut Self
    where
        F: for<'a> Fn(&'a Harness) -> CaseIter<'a> + Send + Sync + 'static,
    {
        self.register(component, unordered_compare, 1, generator)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArchiveProvider> {
        self.providers.iter()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// A single generated test case
pub struct ArchiveCase {
    pub component: ComponentId,
    pub comparator: Comparator,
    pub input: InputData,
    pub expected: Option<serde_json::Value>,
}

impl std::fmt::Debug for ArchiveCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveCase")
            .field("component", &self.component)
            .field("input", &self.input)
            .field("expected", &self.expected)
            .finish()
    }
}

impl ArchiveCase {
    /// Integrate the fixture and check the result with the case's comparator
    pub fn run(&self) -> Result<Option<serde_json::Value>, HarnessError> {
        let result = driver::integrate(&self.input, &self.component)?;
        let actual = result.clone().unwrap_or(serde_json::Value::Null);
        let expected = self.expected.clone().unwrap_or(serde_json::Value::Null);
        (self.comparator)(&actual, &expected)?;
        Ok(result)
    }
}
