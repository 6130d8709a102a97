//! The class-level event tier as seen from a component.

use tessera_core::Class;

use crate::event::Subscription;

/// Handlers registered against a class rather than an instance.
///
/// A component consults this after its own handlers have run without
/// marking the event handled. Implementations decide how class ancestry is
/// walked; the returned list is delivered in order with the same
/// short-circuit rule as instance handlers.
pub trait GlobalEvents {
    /// The handlers to run when a component of `class` triggers `name`.
    fn handlers(&self, class: &'static Class, name: &str) -> Vec<Subscription>;

    /// Whether any class-level handler applies.
    fn has_handlers(&self, class: &'static Class, name: &str) -> bool {
        !self.handlers(class, name).is_empty()
    }
}

/// A class-level tier with no handlers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGlobalEvents;

impl GlobalEvents for NoGlobalEvents {
    fn handlers(&self, _class: &'static Class, _name: &str) -> Vec<Subscription> {
        Vec::new()
    }

    fn has_handlers(&self, _class: &'static Class, _name: &str) -> bool {
        false
    }
}
