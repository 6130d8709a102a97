//! Collaborator seams: locating and creating objects by name.
//!
//! The runtime never hardcodes where objects come from. A [`Locator`]
//! answers "give me the object registered under this id", a [`Container`]
//! additionally knows how to build objects from a class name or a factory.
//! Concrete implementations live in `tessera-di`.

use std::fmt;
use std::rc::Rc;

use tessera_core::{Config, ObjectError, Value};

use crate::object_ref::ObjectRef;
use crate::runtime::Runtime;

/// Builds an object from constructor parameters and a configuration.
pub type Factory = Rc<dyn Fn(&Rc<Runtime>, &[Value], Config) -> Result<ObjectRef, ObjectError>>;

/// Looks objects up by id.
pub trait Locator {
    /// Whether `id` is known to this locator.
    fn has(&self, id: &str) -> bool;

    /// Fetch the object registered as `id`.
    fn get(&self, runtime: &Rc<Runtime>, id: &str) -> Result<ObjectRef, ObjectError>;
}

/// A [`Locator`] that can also build new objects.
pub trait Container: Locator {
    /// Build a new instance of `class`, applying `config` before its init hook.
    fn create(
        &self,
        runtime: &Rc<Runtime>,
        class: &str,
        params: &[Value],
        config: Config,
    ) -> Result<ObjectRef, ObjectError>;

    /// Run a factory.
    fn invoke(
        &self,
        runtime: &Rc<Runtime>,
        factory: &Factory,
        params: &[Value],
    ) -> Result<ObjectRef, ObjectError> {
        factory(runtime, params, Config::new())
    }
}

/// How to build an object.
#[derive(Clone)]
pub enum ObjectSpec {
    /// A class name known to the container.
    Class(String),
    /// A mapping with a `"class"` entry; the other entries configure the instance.
    Config(Config),
    /// A factory callable.
    Factory(Factory),
}

impl ObjectSpec {
    /// Interpret a dynamic value: a string names a class, a mapping is a
    /// configuration.
    pub fn from_value(value: Value) -> Result<Self, ObjectError> {
        match value {
            Value::String(class) => Ok(Self::Class(class)),
            Value::Object(config) => Ok(Self::Config(config)),
            other => Err(ObjectError::InvalidConfiguration(format!(
                "unsupported object specification: {other}"
            ))),
        }
    }

    /// Wrap a closure as a factory specification.
    pub fn factory(
        factory: impl Fn(&Rc<Runtime>, &[Value], Config) -> Result<ObjectRef, ObjectError> + 'static,
    ) -> Self {
        Self::Factory(Rc::new(factory))
    }
}

impl From<&str> for ObjectSpec {
    fn from(class: &str) -> Self {
        Self::Class(class.to_owned())
    }
}

impl From<String> for ObjectSpec {
    fn from(class: String) -> Self {
        Self::Class(class)
    }
}

impl From<Config> for ObjectSpec {
    fn from(config: Config) -> Self {
        Self::Config(config)
    }
}

impl fmt::Debug for ObjectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(class) => f.debug_tuple("Class").field(class).finish(),
            Self::Config(config) => f.debug_tuple("Config").field(config).finish(),
            Self::Factory(factory) => {
                write!(f, "Factory({:p})", Rc::as_ptr(factory).cast::<()>())
            }
        }
    }
}

impl fmt::Display for ObjectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(class) => f.write_str(class),
            Self::Config(config) => match config.get("class").and_then(Value::as_str) {
                Some(class) => f.write_str(class),
                None => f.write_str("<configuration>"),
            },
            Self::Factory(_) => f.write_str("<factory>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_accepts_strings_and_mappings() {
        assert!(matches!(
            ObjectSpec::from_value(json!("Widget")).unwrap(),
            ObjectSpec::Class(c) if c == "Widget"
        ));
        let spec = ObjectSpec::from_value(json!({"class": "Widget", "title": "x"})).unwrap();
        assert_eq!(spec.to_string(), "Widget");
    }

    #[test]
    fn from_value_rejects_scalars() {
        let err = ObjectSpec::from_value(json!(12)).unwrap_err();
        assert!(matches!(err, ObjectError::InvalidConfiguration(_)));
    }
}
