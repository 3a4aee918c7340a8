//! # Parsers
//!
//! Turn collected content records into structured data. A parser is a plain
//! type implementing [`Parser`]; [`ParserComponent`] adapts it into a graph
//! component reading one spec.

pub mod snmp;

use factgraph_core::broker::Broker;
use factgraph_core::executor::ComponentError;
use factgraph_core::logging::codes;
use factgraph_core::registry::Component;
use factgraph_core::types::{ComponentId, ContentRecord, Value};
use factgraph_core::log_warning;
use serde::Serialize;
use std::marker::PhantomData;

/// Errors raised while parsing a content record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Empty Content")]
    EmptyContent,

    #[error("Invalid value on line {line}: {reason}")]
    InvalidValue { line: usize, reason: String },
}

impl From<ParseError> for ComponentError {
    fn from(error: ParseError) -> Self {
        ComponentError::Parse(error.to_string())
    }
}

/// Structured view built from one content record
pub trait Parser: Serialize + Sized {
    fn parse(record: &ContentRecord) -> Result<Self, ParseError>;
}

/// Graph component running parser `P` over the records of `spec`.
///
/// A single record yields the parsed object. A multi-output spec yields a
/// list holding one entry per record that parsed; records that fail are
/// logged and left out, and the node fails only when none parse.
pub struct ParserComponent<P> {
    spec: ComponentId,
    _parser: PhantomData<fn() -> P>,
}

impl<P: Parser> ParserComponent<P> {
    pub fn new(spec: impl Into<ComponentId>) -> Self {
        Self {
            spec: spec.into(),
            _parser: PhantomData,
        }
    }

    pub fn spec(&self) -> &ComponentId {
        &self.spec
    }

    fn parse_all(&self, records: &[ContentRecord]) -> Result<Value, ComponentError> {
        let mut parsed = Vec::with_capacity(records.len());
        let mut first_error = None;

        for record in records {
            match P::parse(record) {
                Ok(value) => parsed.push(serde_json::to_value(&value)?),
                Err(e) => {
                    log_warning!(
                        code = codes::content::PARSE_FAILED,
                        "Record skipped by parser",
                        "spec" => &self.spec,
                        "path" => &record.path,
                        "error" => &e
                    );
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if parsed.is_empty() => Err(e.into()),
            _ => Ok(Value::Data(serde_json::Value::Array(parsed))),
        }
    }
}

impl<P: Parser> Component for ParserComponent<P> {
    fn invoke(&self, broker: &Broker) -> Result<Value, ComponentError> {
        match broker.get(&self.spec) {
            Some(Value::Content(record)) => Ok(Value::data(&P::parse(record)?)?),
            Some(Value::ContentList(records)) => self.parse_all(records),
            Some(Value::Data(_)) => Err(ComponentError::InvalidDependency {
                dependency: self.spec.clone(),
                reason: "expected content records".to_string(),
            }),
            None => Err(ComponentError::MissingDependency(self.spec.clone())),
        }
    }

    fn describe(&self) -> String {
        format!("{} <- {}", std::any::type_name::<P>(), self.spec)
    }
}
