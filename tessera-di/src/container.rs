//! An in-process [`Container`] backed by a class-name registry.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tessera_component::{
    Behavior, BehaviorRef, Component, ComponentRef, Container, Factory, Locator, ObjectRef,
    Runtime,
};
use tessera_core::{Config, ObjectError, Value};
use tracing::debug;

/// In-process container that builds objects from registered factories.
///
/// Definitions are keyed by class name. `create` always builds a new
/// instance; `get` returns a shared instance when one was registered with
/// [`set_shared`](Self::set_shared) and builds a fresh one otherwise.
/// No autowiring, no singletons by default.
pub struct LocalContainer {
    definitions: RefCell<HashMap<String, Factory>>,
    shared: RefCell<HashMap<String, ObjectRef>>,
}

impl LocalContainer {
    /// Create a new empty container.
    pub fn new() -> Self {
        Self {
            definitions: RefCell::new(HashMap::new()),
            shared: RefCell::new(HashMap::new()),
        }
    }

    /// Register a factory under `class`, replacing any previous one.
    pub fn register(
        &self,
        class: impl Into<String>,
        factory: impl Fn(&Rc<Runtime>, &[Value], Config) -> Result<ObjectRef, ObjectError> + 'static,
    ) {
        let class = class.into();
        debug!(class = %class, "definition registered");
        self.definitions
            .borrow_mut()
            .insert(class, Rc::new(factory));
    }

    /// Register a component type under its class name.
    ///
    /// Instances start from `C::default()`; the configuration is applied
    /// before the init hook runs.
    pub fn register_component<C: Component + Default>(&self) {
        let class = C::default().class().name();
        self.register(class, |runtime, _params, config| {
            Ok(ComponentRef::new(runtime, C::default(), config)?.into())
        });
    }

    /// Register a behavior type under its class name.
    pub fn register_behavior<B: Behavior + Default>(&self) {
        let class = B::default().class().name();
        self.register(class, |_runtime, _params, config| {
            Ok(BehaviorRef::with_config(B::default(), config)?.into())
        });
    }

    /// Make `get(id)` return `object` instead of building a new instance.
    pub fn set_shared(&self, id: impl Into<String>, object: impl Into<ObjectRef>) {
        self.shared.borrow_mut().insert(id.into(), object.into());
    }

    /// Whether a factory is registered for `class`.
    pub fn has_definition(&self, class: &str) -> bool {
        self.definitions.borrow().contains_key(class)
    }

    /// Forget every definition and shared instance.
    pub fn clear(&self) {
        self.definitions.borrow_mut().clear();
        self.shared.borrow_mut().clear();
    }
}

impl Default for LocalContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Locator for LocalContainer {
    fn has(&self, id: &str) -> bool {
        self.shared.borrow().contains_key(id) || self.has_definition(id)
    }

    fn get(&self, runtime: &Rc<Runtime>, id: &str) -> Result<ObjectRef, ObjectError> {
        let shared = self.shared.borrow().get(id).cloned();
        match shared {
            Some(object) => Ok(object),
            None => self.create(runtime, id, &[], Config::new()),
        }
    }
}

impl Container for LocalContainer {
    fn create(
        &self,
        runtime: &Rc<Runtime>,
        class: &str,
        params: &[Value],
        config: Config,
    ) -> Result<ObjectRef, ObjectError> {
        // Factories may call back into the container.
        let factory = self
            .definitions
            .borrow()
            .get(class)
            .cloned()
            .ok_or_else(|| ObjectError::UnknownClass(class.to_owned()))?;
        debug!(class = %class, "creating object");
        factory(runtime, params, config)
    }
}

impl std::fmt::Debug for LocalContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut classes: Vec<_> = self.definitions.borrow().keys().cloned().collect();
        classes.sort();
        let mut shared: Vec<_> = self.shared.borrow().keys().cloned().collect();
        shared.sort();
        f.debug_struct("LocalContainer")
            .field("definitions", &classes)
            .field("shared", &shared)
            .finish()
    }
}
