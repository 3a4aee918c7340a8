//! Producer trait implemented by every registered component

use crate::broker::Broker;
use crate::executor::ComponentError;
use crate::types::Value;

/// A unit of work that computes one value from already-resolved dependencies
pub trait Component: Send + Sync {
    /// Compute this component's value.
    ///
    /// The broker holds every dependency that resolved before this node in
    /// topological order. Optional dependencies may be absent.
    fn invoke(&self, broker: &Broker) -> Result<Value, ComponentError>;

    /// Optional: identifier used in diagnostics
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// Component backed by a closure
pub struct FnComponent<F> {
    func: F,
}

/// Wrap a closure as a component
pub fn from_fn<F>(func: F) -> FnComponent<F>
where
    F: Fn(&Broker) -> Result<Value, ComponentError> + Send + Sync,
{
    FnComponent { func }
}

impl<F> Component for FnComponent<F>
where
    F: Fn(&Broker) -> Result<Value, ComponentError> + Send + Sync,
{
    fn invoke(&self, broker: &Broker) -> Result<Value, ComponentError> {
        (self.func)(broker)
    }

    fn describe(&self) -> String {
        "closure".to_string()
    }
}

/// Component for values that only ever arrive pre-seeded (fixtures, collection)
pub struct Seeded;

impl Component for Seeded {
    fn invoke(&self, _broker: &Broker) -> Result<Value, ComponentError> {
        Err(ComponentError::skip("value is supplied by collection"))
    }

    fn describe(&self) -> String {
        "seeded".to_string()
    }
}
