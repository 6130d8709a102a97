#![deny(missing_docs)]
//! Class-level event handlers for tessera.
//!
//! The [`ClassEventRegistry`] holds handlers registered against a class
//! rather than an instance. A component consults it after its own handlers
//! when an event is triggered, passing its runtime class. Lookups walk the
//! class ancestry, so a handler registered against a base class also fires
//! for every descendant. Handlers of the most-derived class run first, then
//! those of its ancestors in breadth-first order.

use std::cell::RefCell;
use std::collections::HashMap;

use tessera_component::{Event, GlobalEvents, Handler, Subscription};
use tessera_core::{Class, ObjectError, Value};

/// Event handlers keyed by event name and class.
///
/// Mutation goes through `&self` so the registry can be shared with a
/// runtime as an `Rc<dyn GlobalEvents>` and still be edited afterwards.
#[derive(Default)]
pub struct ClassEventRegistry {
    events: RefCell<HashMap<String, HashMap<&'static Class, Vec<Subscription>>>>,
}

impl ClassEventRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler for `name` on instances of `class` and its descendants.
    pub fn on(&self, class: &'static Class, name: &str, handler: Handler) {
        self.subscribe(class, name, handler, Value::Null, true);
    }

    /// Subscribe a handler with data, appending or prepending it among the
    /// handlers of `class`.
    pub fn subscribe(
        &self,
        class: &'static Class,
        name: &str,
        handler: Handler,
        data: Value,
        append: bool,
    ) {
        let mut events = self.events.borrow_mut();
        let list = events
            .entry(name.to_owned())
            .or_default()
            .entry(class)
            .or_default();
        let subscription = Subscription::new(handler, data);
        if append {
            list.push(subscription);
        } else {
            list.insert(0, subscription);
        }
        tracing::debug!(class = %class, event = name, "class-level handler attached");
    }

    /// Remove handlers registered directly on `class` for `name`.
    ///
    /// With `None`, all of them go. Otherwise every subscription of an
    /// equal handler is removed. Returns whether anything was removed.
    pub fn off(&self, class: &'static Class, name: &str, handler: Option<&Handler>) -> bool {
        let mut events = self.events.borrow_mut();
        let Some(by_class) = events.get_mut(name) else {
            return false;
        };
        let Some(list) = by_class.get_mut(class) else {
            return false;
        };
        let removed = match handler {
            None => {
                let existed = !list.is_empty();
                list.clear();
                existed
            }
            Some(handler) => {
                let before = list.len();
                list.retain(|s| s.handler != *handler);
                list.len() != before
            }
        };
        if list.is_empty() {
            by_class.remove(class);
        }
        if by_class.is_empty() {
            events.remove(name);
        }
        if removed {
            tracing::debug!(class = %class, event = name, "class-level handler detached");
        }
        removed
    }

    /// Remove every class-level handler.
    pub fn off_all(&self) {
        self.events.borrow_mut().clear();
        tracing::debug!("all class-level handlers detached");
    }

    /// Deliver `event` to the class-level handlers for `class` alone,
    /// without any instance handlers.
    ///
    /// Stops at the first handler that leaves the event handled.
    pub fn trigger(
        &self,
        class: &'static Class,
        name: &str,
        event: &mut Event,
    ) -> Result<(), ObjectError> {
        let handlers = self.handlers(class, name);
        if handlers.is_empty() {
            return Ok(());
        }
        event.begin(name, None);
        if event.dispatch(&handlers)? {
            tracing::debug!(class = %class, event = name, "class-level event handled");
        }
        Ok(())
    }
}

impl GlobalEvents for ClassEventRegistry {
    fn handlers(&self, class: &'static Class, name: &str) -> Vec<Subscription> {
        let events = self.events.borrow();
        let Some(by_class) = events.get(name) else {
            return Vec::new();
        };
        class
            .ancestry()
            .into_iter()
            .filter_map(|tag| by_class.get(tag))
            .flatten()
            .cloned()
            .collect()
    }

    fn has_handlers(&self, class: &'static Class, name: &str) -> bool {
        let events = self.events.borrow();
        let Some(by_class) = events.get(name) else {
            return false;
        };
        class
            .ancestry()
            .into_iter()
            .any(|tag| by_class.get(tag).is_some_and(|list| !list.is_empty()))
    }
}

impl std::fmt::Debug for ClassEventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let events = self.events.borrow();
        let mut names: Vec<_> = events.keys().collect();
        names.sort();
        f.debug_struct("ClassEventRegistry")
            .field("events", &names)
            .finish()
    }
}
