//! Tally: a behavior that counts the owner events it hears.

use std::sync::LazyLock;

use serde_json::json;
use tessera_core::value::{decode, encode};
use tessera_core::{AccessorTable, Class, Object, ObjectError, PropertyResolver, Value};

use crate::behavior::{BEHAVIOR, Behavior, HandlerSpec};
use crate::component::ComponentRef;
use crate::event::Event;

/// Type tag for [`Tally`].
pub static TALLY: Class = Class::new("Tally", &[&BEHAVIOR]);

/// A behavior exposing:
///
/// - `tally`: read/write property, bumped by every watched event
/// - `label`: read/write property, null by default
/// - `attachments`: read-only count of `attached` hook calls
/// - `secret`: write-only property
/// - `bump(amount?)`: adds `amount` or one, returns the new tally
///
/// Watches `"tick"` unless told otherwise. Each delivery stores the
/// subscription data in `last_data`.
#[derive(Debug)]
pub struct Tally {
    /// Number of watched events and bumps seen.
    pub tally: i64,
    /// Optional label.
    pub label: Option<String>,
    /// Number of times the behavior was attached.
    pub attachments: u32,
    /// Number of times the behavior was detached.
    pub detachments: u32,
    /// The `data` of the last delivered event.
    pub last_data: Value,
    /// Set through the write-only `secret` property.
    pub secret: Option<String>,
    watched: Vec<String>,
}

impl Tally {
    /// A tally watching the given owner events.
    pub fn watching(events: &[&str]) -> Self {
        Self {
            tally: 0,
            label: None,
            attachments: 0,
            detachments: 0,
            last_data: Value::Null,
            secret: None,
            watched: events.iter().map(|e| (*e).to_owned()).collect(),
        }
    }

    fn get_tally(&self) -> Value {
        json!(self.tally)
    }

    fn set_tally(&mut self, value: Value) -> Result<(), ObjectError> {
        self.tally = decode("Tally", "tally", value)?;
        Ok(())
    }

    fn get_label(&self) -> Value {
        encode(&self.label)
    }

    fn set_label(&mut self, value: Value) -> Result<(), ObjectError> {
        self.label = decode("Tally", "label", value)?;
        Ok(())
    }

    fn get_attachments(&self) -> Value {
        json!(self.attachments)
    }

    fn set_secret(&mut self, value: Value) -> Result<(), ObjectError> {
        self.secret = decode("Tally", "secret", value)?;
        Ok(())
    }

    fn bump(&mut self, args: &[Value]) -> Result<Value, ObjectError> {
        let amount: i64 = match args.first() {
            Some(value) => decode("Tally", "bump", value.clone())?,
            None => 1,
        };
        self.tally += amount;
        Ok(json!(self.tally))
    }

    fn on_event(&mut self, event: &mut Event) -> Result<(), ObjectError> {
        self.tally += 1;
        self.last_data = event.data.clone();
        Ok(())
    }
}

impl Default for Tally {
    fn default() -> Self {
        Self::watching(&["tick"])
    }
}

impl Object for Tally {
    fn class(&self) -> &'static Class {
        &TALLY
    }

    fn resolver(&self) -> &'static dyn PropertyResolver {
        static TABLE: LazyLock<AccessorTable<Tally>> = LazyLock::new(|| {
            AccessorTable::new()
                .property("tally", Tally::get_tally, Tally::set_tally)
                .property("label", Tally::get_label, Tally::set_label)
                .getter("attachments", Tally::get_attachments)
                .setter("secret", Tally::set_secret)
                .method("bump", Tally::bump)
        });
        &*TABLE
    }
}

impl Behavior for Tally {
    fn events(&self) -> Vec<(String, HandlerSpec<Self>)> {
        self.watched
            .iter()
            .map(|event| (event.clone(), HandlerSpec::method("on_event", Tally::on_event)))
            .collect()
    }

    fn attached(&mut self, _owner: &ComponentRef) -> Result<(), ObjectError> {
        self.attachments += 1;
        Ok(())
    }

    fn detached(&mut self) {
        self.detachments += 1;
    }
}
