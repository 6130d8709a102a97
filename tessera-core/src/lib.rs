//! # tessera-core — the accessor-object protocol
//!
//! This crate defines the data model and the first resolution tier shared by
//! every tessera crate. Components, behaviors and the deferred-reference
//! resolver all build on it.
//!
//! ## Contents
//!
//! | Module | Types | What it does |
//! |--------|-------|-------------|
//! | [`class`] | [`Class`] | Static type tags with explicit ancestry (`is_a`) |
//! | [`object`] | [`Object`], [`ObjectExt`], [`AccessorTable`], [`PropertyResolver`] | Table-driven dynamic properties and methods |
//! | [`value`] | [`Value`] | Dynamic values and typed conversion at the boundary |
//! | [`config`] | [`Config`] | Ordered construction-time configuration |
//! | [`error`] | [`ObjectError`], [`Access`] | The error taxonomy |
//!
//! ## Design Principle
//!
//! There is no ambient interception. Every dynamic access goes through an
//! explicit [`PropertyResolver`]: a per-type table of getters, setters,
//! fields and methods, registered once. Capability queries are answered by
//! the table alone, without touching an instance, which lets hosts query
//! their delegates cheaply and without borrowing them.
//!
//! ## Dependency Notes
//!
//! Values are `serde_json::Value`, with the `preserve_order` feature so
//! configuration mappings apply in the order they were written. Typed
//! accessors convert with `serde` at the edge ([`value::decode`]).

#![deny(missing_docs)]

pub mod class;
pub mod config;
pub mod error;
pub mod object;
pub mod value;

// Re-exports for convenience
pub use class::{Class, OBJECT};
pub use config::Config;
pub use error::{Access, ObjectError};
pub use object::{
    AccessorTable, AsAny, Getter, Method, Object, ObjectExt, PropertyResolver, Setter, construct,
};
pub use value::Value;
