//! # tessera-component — components, behaviors and events
//!
//! Builds on the accessor-object protocol of `tessera-core` with two
//! kinds of composition: event subscriptions and attachable behaviors.
//!
//! ## Contents
//!
//! | Module | Types | What it does |
//! |--------|-------|-------------|
//! | [`component`] | [`Component`], [`ComponentRef`], [`BehaviorKey`], [`BehaviorSpec`] | Live components with behavior-aware property resolution |
//! | [`behavior`] | [`Behavior`], [`BehaviorRef`], [`HandlerSpec`] | Objects attachable to exactly one component |
//! | [`event`] | [`Event`], [`Handler`], [`Subscription`] | Event records and the dispatch loop |
//! | [`global`] | [`GlobalEvents`] | The class-level event tier a component consults after its own handlers |
//! | [`locator`] | [`Locator`], [`Container`], [`ObjectSpec`] | Seams for finding and building objects |
//! | [`runtime`] | [`Runtime`] | The explicit process-wide context |
//! | [`object_ref`] | [`ObjectRef`] | A handle to either kind of object |
//!
//! ## Threading
//!
//! Everything here is single-threaded. Handles are `Rc`-based and interior
//! state lives in `RefCell`s that are never borrowed across a call into
//! user code, so handlers and behaviors may call back into the component
//! that invoked them. Touching an object that is itself mid-call reports
//! `ObjectError::Reentrant` instead of panicking.

#![deny(missing_docs)]

pub mod behavior;
pub mod component;
pub mod event;
pub mod global;
pub mod locator;
pub mod object_ref;
pub mod runtime;

#[cfg(feature = "test-utils")]
pub mod test_utils;

// Re-exports for convenience
pub use behavior::{BEHAVIOR, Behavior, BehaviorRef, HandlerMethod, HandlerSpec};
pub use component::{
    BehaviorKey, BehaviorSpec, COMPONENT, Component, ComponentRef, WeakComponentRef,
};
pub use event::{Event, Handler, Subscription};
pub use global::{GlobalEvents, NoGlobalEvents};
pub use locator::{Container, Factory, Locator, ObjectSpec};
pub use object_ref::ObjectRef;
pub use runtime::Runtime;
