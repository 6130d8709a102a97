//! # tessera-di — deferred references and object containers
//!
//! Objects often depend on collaborators that are named in configuration
//! rather than wired by hand. This crate turns those names and descriptors
//! into live objects.
//!
//! ## Contents
//!
//! | Module | Types | What it does |
//! |--------|-------|-------------|
//! | [`instance`] | [`Instance`], [`Reference`], [`ensure`] | Deferred references and the normalizer that resolves them |
//! | [`container`] | [`LocalContainer`] | Builds objects from registered class factories |
//! | [`locator`] | [`ServiceLocator`] | Named objects, built lazily and cached |
//!
//! ## Resolution order
//!
//! An [`Instance`] resolved without an explicit locator asks the runtime's
//! application first, when it knows the id, and the default container
//! otherwise. [`ensure`] accepts any [`Reference`] and checks the result
//! against an expected class.

#![deny(missing_docs)]

pub mod container;
pub mod instance;
pub mod locator;

// Re-exports for convenience
pub use container::LocalContainer;
pub use instance::{Instance, Reference, ensure};
pub use locator::ServiceLocator;
