#![deny(missing_docs)]
//! # tessera — umbrella crate
//!
//! A single import surface for the tessera object runtime. Re-exports the
//! member crates behind feature flags, plus a `prelude` for the happy path.

pub use tessera_core;
#[cfg(feature = "component")]
pub use tessera_component;
#[cfg(feature = "di")]
pub use tessera_di;
#[cfg(feature = "events")]
pub use tessera_events;

/// Happy-path imports for defining and wiring tessera objects.
pub mod prelude {
    pub use tessera_core::{
        AccessorTable, Class, Config, OBJECT, Object, ObjectError, ObjectExt, PropertyResolver,
        Value,
    };

    #[cfg(feature = "component")]
    pub use tessera_component::{
        BEHAVIOR, Behavior, BehaviorKey, BehaviorRef, BehaviorSpec, COMPONENT, Component,
        ComponentRef, Container, Event, Handler, HandlerSpec, Locator, ObjectRef, ObjectSpec,
        Runtime,
    };

    #[cfg(feature = "events")]
    pub use tessera_events::ClassEventRegistry;

    #[cfg(feature = "di")]
    pub use tessera_di::{Instance, LocalContainer, ServiceLocator, ensure};
}
