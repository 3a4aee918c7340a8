//! Component identity and declared metadata

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique key naming a unit of collected data or derived fact
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last dotted segment, e.g. `TcpIpStats` for `parsers.snmp.TcpIpStats`
    pub fn short_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ComponentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&ComponentId> for ComponentId {
    fn from(id: &ComponentId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for ComponentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// What role a component plays in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    /// Execution context (host root, hostname)
    Context,
    /// Raw collected data: a file or command output
    Spec,
    /// Computed collected data that is not a plain file
    Datasource,
    /// Turns content records into structured data
    Parser,
    /// Evaluates parsed data into a pass/fail/skip result
    Rule,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Context => "Context",
            Self::Spec => "Spec",
            Self::Datasource => "Datasource",
            Self::Parser => "Parser",
            Self::Rule => "Rule",
        }
    }

    /// Whether values of this kind are content records
    pub fn produces_content(&self) -> bool {
        matches!(self, Self::Spec | Self::Datasource)
    }
}

/// Declared metadata for a registered component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentMetadata {
    pub kind: ComponentKind,
    /// Content is passed through unmodified (no line splitting or filtering)
    pub raw: bool,
    /// May produce an ordered sequence of results rather than one
    pub multi_output: bool,
    /// Lines may be reduced by registered filter patterns
    pub filterable: bool,
    pub description: String,
}

impl ComponentMetadata {
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            raw: false,
            multi_output: false,
            filterable: false,
            description: String::new(),
        }
    }

    pub fn spec() -> Self {
        Self::new(ComponentKind::Spec)
    }

    pub fn datasource() -> Self {
        Self::new(ComponentKind::Datasource)
    }

    pub fn parser() -> Self {
        Self::new(ComponentKind::Parser)
    }

    pub fn rule() -> Self {
        Self::new(ComponentKind::Rule)
    }

    pub fn context() -> Self {
        Self::new(ComponentKind::Context)
    }

    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }

    pub fn multi_output(mut self) -> Self {
        self.multi_output = true;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn capability(&self) -> Capability {
        Capability {
            is_raw: self.raw,
            is_multi_output: self.multi_output,
        }
    }
}

/// How content for a component is stored, queried once per fixture addition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capability {
    pub is_raw: bool,
    pub is_multi_output: bool,
}
