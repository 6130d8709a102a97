//! Recorder: builds handlers that log every call.

use std::cell::RefCell;
use std::rc::Rc;

use tessera_core::Value;

use crate::event::Handler;

/// One recorded handler call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// The label the handler was built with.
    pub label: String,
    /// The event name being delivered.
    pub event: String,
    /// The subscription data visible to the handler.
    pub data: Value,
}

/// Hands out handlers that append a [`Call`] to a shared log.
/// Use `.labels()` or `.calls()` to inspect what ran.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Rc<RefCell<Vec<Call>>>,
}

impl Recorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler that records a call labelled `label`.
    pub fn handler(&self, label: &str) -> Handler {
        self.build(label, false)
    }

    /// A handler that records a call, then marks the event handled.
    pub fn stopping(&self, label: &str) -> Handler {
        self.build(label, true)
    }

    fn build(&self, label: &str, stop: bool) -> Handler {
        let calls = Rc::clone(&self.calls);
        let label = label.to_owned();
        Handler::from_fn(move |event| {
            calls.borrow_mut().push(Call {
                label: label.clone(),
                event: event.name.clone(),
                data: event.data.clone(),
            });
            if stop {
                event.handled = true;
            }
        })
    }

    /// Labels of the recorded calls, in call order.
    pub fn labels(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.label.clone()).collect()
    }

    /// A snapshot of every recorded call.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}
