//! A lazily populated registry of named components.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tessera_component::{Locator, ObjectRef, ObjectSpec, Runtime};
use tessera_core::ObjectError;
use tracing::debug;

/// Named objects, built on first access and cached afterwards.
///
/// This is the shape of an application: `Instance::get` consults it before
/// the default container whenever it knows the requested id.
#[derive(Default)]
pub struct ServiceLocator {
    components: RefCell<HashMap<String, ObjectRef>>,
    definitions: RefCell<HashMap<String, ObjectSpec>>,
}

impl ServiceLocator {
    /// Create a new empty locator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define how to build `id`. Drops any instance already built for it.
    pub fn set(&self, id: impl Into<String>, spec: impl Into<ObjectSpec>) {
        let id = id.into();
        self.components.borrow_mut().remove(&id);
        self.definitions.borrow_mut().insert(id, spec.into());
    }

    /// Register a live object under `id`.
    pub fn set_instance(&self, id: impl Into<String>, object: impl Into<ObjectRef>) {
        let id = id.into();
        self.definitions.borrow_mut().remove(&id);
        self.components.borrow_mut().insert(id, object.into());
    }

    /// Forget `id` entirely.
    pub fn clear(&self, id: &str) {
        self.components.borrow_mut().remove(id);
        self.definitions.borrow_mut().remove(id);
    }

    /// Whether `id` has already been built (or was registered live).
    pub fn has_instance(&self, id: &str) -> bool {
        self.components.borrow().contains_key(id)
    }
}

impl Locator for ServiceLocator {
    fn has(&self, id: &str) -> bool {
        self.components.borrow().contains_key(id) || self.definitions.borrow().contains_key(id)
    }

    fn get(&self, runtime: &Rc<Runtime>, id: &str) -> Result<ObjectRef, ObjectError> {
        if let Some(object) = self.components.borrow().get(id) {
            return Ok(object.clone());
        }
        let spec = self
            .definitions
            .borrow()
            .get(id)
            .cloned()
            .ok_or_else(|| ObjectError::UnknownClass(id.to_owned()))?;
        debug!(id = %id, spec = %spec, "instantiating component");
        let object = runtime.create_object(&spec, &[])?;
        self.components
            .borrow_mut()
            .insert(id.to_owned(), object.clone());
        Ok(object)
    }
}

impl std::fmt::Debug for ServiceLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<_> = self.definitions.borrow().keys().cloned().collect();
        ids.extend(self.components.borrow().keys().cloned());
        ids.sort();
        ids.dedup();
        f.debug_struct("ServiceLocator").field("ids", &ids).finish()
    }
}
