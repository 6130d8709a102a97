//! Counter: a small component with a property, a field and a method.

use std::sync::LazyLock;

use serde_json::json;
use tessera_core::value::decode;
use tessera_core::{AccessorTable, Class, Object, ObjectError, PropertyResolver, Value};

use crate::behavior::BehaviorRef;
use crate::component::{BehaviorKey, BehaviorSpec, COMPONENT, Component};

use super::Tally;

/// Type tag for [`Counter`].
pub static COUNTER: Class = Class::new("Counter", &[&COMPONENT]);

/// A component exposing:
///
/// - `count`: read/write property
/// - `step`: declared field, used by `increment`
/// - `doubled`: read-only property
/// - `increment(amount?)`: adds `amount`, or `step` when omitted, and returns the new count
///
/// Every instance declares a fresh [`Tally`] behavior per name given to
/// [`with_tallies`](Self::with_tallies).
#[derive(Debug, Clone)]
pub struct Counter {
    /// Current value.
    pub count: i64,
    /// Default increment.
    pub step: i64,
    /// Whether `init` has run.
    pub initialized: bool,
    tallies: Vec<String>,
}

impl Counter {
    /// A counter at zero with a step of one and no declared behaviors.
    pub fn new() -> Self {
        Self {
            count: 0,
            step: 1,
            initialized: false,
            tallies: Vec::new(),
        }
    }

    /// Declare a [`Tally`] under each of `names`.
    pub fn with_tallies(mut self, names: &[&str]) -> Self {
        self.tallies = names.iter().map(|n| (*n).to_owned()).collect();
        self
    }

    fn get_count(&self) -> Value {
        json!(self.count)
    }

    fn set_count(&mut self, value: Value) -> Result<(), ObjectError> {
        self.count = decode("Counter", "count", value)?;
        Ok(())
    }

    fn get_step(&self) -> Value {
        json!(self.step)
    }

    fn set_step(&mut self, value: Value) -> Result<(), ObjectError> {
        self.step = decode("Counter", "step", value)?;
        Ok(())
    }

    fn get_doubled(&self) -> Value {
        json!(self.count * 2)
    }

    fn increment(&mut self, args: &[Value]) -> Result<Value, ObjectError> {
        let amount = match args.first() {
            Some(value) => decode("Counter", "increment", value.clone())?,
            None => self.step,
        };
        self.count += amount;
        Ok(json!(self.count))
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

impl Object for Counter {
    fn class(&self) -> &'static Class {
        &COUNTER
    }

    fn resolver(&self) -> &'static dyn PropertyResolver {
        static TABLE: LazyLock<AccessorTable<Counter>> = LazyLock::new(|| {
            AccessorTable::new()
                .property("count", Counter::get_count, Counter::set_count)
                .field("step", Counter::get_step, Counter::set_step)
                .getter("doubled", Counter::get_doubled)
                .method("increment", Counter::increment)
        });
        &*TABLE
    }

    fn init(&mut self) -> Result<(), ObjectError> {
        self.initialized = true;
        Ok(())
    }
}

impl Component for Counter {
    fn behaviors(&self) -> Vec<(BehaviorKey, BehaviorSpec)> {
        self.tallies
            .iter()
            .map(|name| {
                (
                    BehaviorKey::from(name.as_str()),
                    BehaviorSpec::from(BehaviorRef::new(Tally::default())),
                )
            })
            .collect()
    }
}
