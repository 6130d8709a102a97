//! Event records, handlers and the shared dispatch loop.

use std::fmt;
use std::rc::Rc;

use tessera_core::{ObjectError, Value};

use crate::component::ComponentRef;

/// The record passed to every handler of a single trigger.
///
/// `handled` is the only cancellation signal: a handler that sets it stops
/// the remaining handlers, including the class-level tier.
#[derive(Clone, Default)]
pub struct Event {
    /// Name of the event being delivered.
    pub name: String,
    /// The component that triggered the event. Defaults to the triggering component.
    pub sender: Option<ComponentRef>,
    /// Set by a handler to stop further propagation.
    pub handled: bool,
    /// Data stored alongside the handler currently running.
    pub data: Value,
    /// Event-specific payload supplied by the code that triggers the event.
    pub payload: Value,
}

impl Event {
    /// Create an empty event record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an event record carrying a payload.
    pub fn with_payload(payload: Value) -> Self {
        Self {
            payload,
            ..Self::default()
        }
    }

    /// Prepare the record for delivery of `name`.
    ///
    /// Keeps a sender that was supplied by the caller, resets `handled`.
    pub fn begin(&mut self, name: &str, sender: Option<&ComponentRef>) {
        if self.sender.is_none() {
            self.sender = sender.cloned();
        }
        self.handled = false;
        self.name = name.to_owned();
    }

    /// Run `subscriptions` in order, stopping at the first one that leaves
    /// the record handled.
    ///
    /// Returns whether the event ended up handled. A handler error stops
    /// delivery and is returned as-is.
    pub fn dispatch(&mut self, subscriptions: &[Subscription]) -> Result<bool, ObjectError> {
        for subscription in subscriptions {
            self.data = subscription.data.clone();
            tracing::trace!(event = %self.name, handler = ?subscription.handler, "dispatching handler");
            subscription.handler.call(self)?;
            if self.handled {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("sender", &self.sender.as_ref().map(|s| s.class().name()))
            .field("handled", &self.handled)
            .field("data", &self.data)
            .field("payload", &self.payload)
            .finish()
    }
}

type Callback = dyn Fn(&mut Event) -> Result<(), ObjectError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Closure,
    Method { target: usize, name: &'static str },
}

/// An event handler.
///
/// Handlers compare by identity: two clones of the same handler are equal,
/// two separately built closures are not. Handlers bound to a behavior
/// method compare equal when they name the same method on the same
/// behavior instance, however many times they were built.
#[derive(Clone)]
pub struct Handler {
    callback: Rc<Callback>,
    origin: Origin,
}

impl Handler {
    /// Wrap a fallible closure.
    pub fn new(callback: impl Fn(&mut Event) -> Result<(), ObjectError> + 'static) -> Self {
        Self {
            callback: Rc::new(callback),
            origin: Origin::Closure,
        }
    }

    /// Wrap a closure that cannot fail.
    pub fn from_fn(callback: impl Fn(&mut Event) + 'static) -> Self {
        Self::new(move |event| {
            callback(event);
            Ok(())
        })
    }

    pub(crate) fn method(
        target: usize,
        name: &'static str,
        callback: impl Fn(&mut Event) -> Result<(), ObjectError> + 'static,
    ) -> Self {
        Self {
            callback: Rc::new(callback),
            origin: Origin::Method { target, name },
        }
    }

    /// Invoke the handler.
    pub fn call(&self, event: &mut Event) -> Result<(), ObjectError> {
        (self.callback)(event)
    }

    /// The behavior method this handler is bound to, if any.
    pub fn method_name(&self) -> Option<&'static str> {
        match self.origin {
            Origin::Method { name, .. } => Some(name),
            Origin::Closure => None,
        }
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        match (self.origin, other.origin) {
            (Origin::Closure, Origin::Closure) => Rc::ptr_eq(&self.callback, &other.callback),
            (a, b) => a == b,
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin {
            Origin::Closure => write!(f, "Handler({:p})", Rc::as_ptr(&self.callback).cast::<()>()),
            Origin::Method { target, name } => write!(f, "Handler({target:#x}::{name})"),
        }
    }
}

/// A handler together with the data to expose while it runs.
#[derive(Debug, Clone)]
pub struct Subscription {
    /// The handler.
    pub handler: Handler,
    /// Copied into [`Event::data`] before the handler runs.
    pub data: Value,
}

impl Subscription {
    /// Pair a handler with its data.
    pub fn new(handler: Handler, data: Value) -> Self {
        Self { handler, data }
    }
}
