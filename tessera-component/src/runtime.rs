//! Process-wide collaborators, passed explicitly.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tessera_core::{Config, ObjectError, Value};
use tracing::debug;

use crate::global::{GlobalEvents, NoGlobalEvents};
use crate::locator::{Container, Locator, ObjectSpec};
use crate::object_ref::ObjectRef;

/// The shared context components and references resolve against.
///
/// Holds the default container, the current application locator and the
/// class-level event tier. Both the container and the application may be
/// absent; operations that need them fail with a configuration error rather
/// than panicking.
pub struct Runtime {
    container: RefCell<Option<Rc<dyn Container>>>,
    application: RefCell<Option<Rc<dyn Locator>>>,
    events: Rc<dyn GlobalEvents>,
}

impl Runtime {
    /// An empty runtime: no container, no application, no class-level handlers.
    pub fn new() -> Self {
        Self {
            container: RefCell::new(None),
            application: RefCell::new(None),
            events: Rc::new(NoGlobalEvents),
        }
    }

    /// Use `container` as the default container.
    pub fn with_container(mut self, container: Rc<dyn Container>) -> Self {
        *self.container.get_mut() = Some(container);
        self
    }

    /// Use `application` as the current application locator.
    pub fn with_application(mut self, application: Rc<dyn Locator>) -> Self {
        *self.application.get_mut() = Some(application);
        self
    }

    /// Use `events` as the class-level event tier.
    pub fn with_events(mut self, events: Rc<dyn GlobalEvents>) -> Self {
        self.events = events;
        self
    }

    /// The default container.
    pub fn container(&self) -> Result<Rc<dyn Container>, ObjectError> {
        self.container.borrow().clone().ok_or_else(|| {
            ObjectError::InvalidConfiguration("no default container is configured".into())
        })
    }

    /// Replace the default container, returning the previous one.
    pub fn set_container(&self, container: Option<Rc<dyn Container>>) -> Option<Rc<dyn Container>> {
        debug!(present = container.is_some(), "default container replaced");
        self.container.replace(container)
    }

    /// The current application locator, if one is installed.
    pub fn application(&self) -> Option<Rc<dyn Locator>> {
        self.application.borrow().clone()
    }

    /// Install or remove the current application locator, returning the previous one.
    pub fn set_application(&self, application: Option<Rc<dyn Locator>>) -> Option<Rc<dyn Locator>> {
        debug!(present = application.is_some(), "application locator replaced");
        self.application.replace(application)
    }

    /// The class-level event tier.
    pub fn events(&self) -> Rc<dyn GlobalEvents> {
        Rc::clone(&self.events)
    }

    /// Build an object through the default container.
    ///
    /// A class name is created with an empty configuration; a mapping must
    /// carry a string `"class"` entry, the remaining entries configure the
    /// instance in order; a factory is run by the container.
    pub fn create_object(
        self: &Rc<Self>,
        spec: &ObjectSpec,
        params: &[Value],
    ) -> Result<ObjectRef, ObjectError> {
        let container = self.container()?;
        debug!(spec = %spec, "creating object");
        match spec {
            ObjectSpec::Class(class) => container.create(self, class, params, Config::new()),
            ObjectSpec::Config(config) => {
                let mut config = config.clone();
                let class = match config.shift_remove("class") {
                    Some(Value::String(class)) => class,
                    _ => {
                        return Err(ObjectError::InvalidConfiguration(
                            "object configuration must contain a \"class\" element".into(),
                        ));
                    }
                };
                container.create(self, &class, params, config)
            }
            ObjectSpec::Factory(factory) => container.invoke(self, factory, params),
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("container", &self.container.borrow().is_some())
            .field("application", &self.application.borrow().is_some())
            .finish_non_exhaustive()
    }
}
