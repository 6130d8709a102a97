//! Deferred references and the `ensure` normalizer.

use std::fmt;
use std::rc::Rc;

use tessera_component::{BehaviorRef, ComponentRef, Container, Locator, ObjectRef, Runtime};
use tessera_core::value::type_name;
use tessera_core::{Class, Config, ObjectError, Value};
use tracing::debug;

/// A reference to an object by id, resolved later.
///
/// ```
/// use tessera_di::Instance;
///
/// let cache = Instance::of("cache");
/// assert_eq!(cache.id(), "cache");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instance {
    id: String,
}

impl Instance {
    /// Wrap an id.
    pub fn of(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The referenced id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Resolve the id.
    ///
    /// An explicit `locator` is used as-is. Otherwise the runtime's
    /// application locator is tried when it knows the id, and the default
    /// container is used for everything else.
    pub fn get(
        &self,
        runtime: &Rc<Runtime>,
        locator: Option<&dyn Locator>,
    ) -> Result<ObjectRef, ObjectError> {
        if let Some(locator) = locator {
            return locator.get(runtime, &self.id);
        }
        if let Some(application) = runtime.application() {
            if application.has(&self.id) {
                return application.get(runtime, &self.id);
            }
        }
        runtime.container()?.get(runtime, &self.id)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Anything [`ensure`] accepts.
#[derive(Debug, Clone)]
pub enum Reference {
    /// A live object.
    Object(ObjectRef),
    /// A descriptor: a mapping with an optional `"class"` entry.
    Config(Config),
    /// An id, wrapped into an [`Instance`] before resolution.
    Id(String),
    /// A deferred reference.
    Pending(Instance),
    /// A raw value. Strings and mappings are treated as ids and descriptors.
    Value(Value),
}

impl From<ObjectRef> for Reference {
    fn from(object: ObjectRef) -> Self {
        Self::Object(object)
    }
}

impl From<ComponentRef> for Reference {
    fn from(component: ComponentRef) -> Self {
        Self::Object(ObjectRef::Component(component))
    }
}

impl From<BehaviorRef> for Reference {
    fn from(behavior: BehaviorRef) -> Self {
        Self::Object(ObjectRef::Behavior(behavior))
    }
}

impl From<Config> for Reference {
    fn from(config: Config) -> Self {
        Self::Config(config)
    }
}

impl From<&str> for Reference {
    fn from(id: &str) -> Self {
        Self::Id(id.to_owned())
    }
}

impl From<String> for Reference {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl From<Instance> for Reference {
    fn from(instance: Instance) -> Self {
        Self::Pending(instance)
    }
}

impl From<Value> for Reference {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(config) => Self::Config(config),
            Value::String(id) => Self::Id(id),
            other => Self::Value(other),
        }
    }
}

/// Turn `reference` into a live object, checking it against `expected`.
///
/// - A descriptor is built by `container` (or the runtime's default
///   container) from its `"class"` entry, falling back to `expected`'s
///   name; the other entries configure the new object.
/// - `Null` and the empty id fail with `MissingComponent`.
/// - An id is resolved as an [`Instance`].
/// - A live object is returned as-is when it satisfies `expected`.
/// - An [`Instance`] is resolved through `container` when given, otherwise
///   through the runtime. Resolution failures are wrapped in
///   `Instantiation`; a result of the wrong class fails with
///   `InvalidComponentType`.
/// - Anything else fails with `InvalidConfiguration`.
pub fn ensure(
    runtime: &Rc<Runtime>,
    reference: impl Into<Reference>,
    expected: Option<&'static Class>,
    container: Option<&dyn Container>,
) -> Result<ObjectRef, ObjectError> {
    let reference = match reference.into() {
        Reference::Value(Value::Object(config)) => Reference::Config(config),
        Reference::Value(Value::String(id)) => Reference::Id(id),
        other => other,
    };
    match reference {
        Reference::Config(config) => build(runtime, config, expected, container),
        Reference::Value(Value::Null) => Err(ObjectError::MissingComponent),
        Reference::Id(id) if id.is_empty() => Err(ObjectError::MissingComponent),
        Reference::Id(id) => resolve(runtime, &Instance::of(id), expected, container),
        Reference::Pending(instance) => resolve(runtime, &instance, expected, container),
        Reference::Object(object) => match expected {
            Some(expected) if !object.is_a(expected) => Err(ObjectError::InvalidConfiguration(
                format!("invalid data type: {}. {} is expected", object.class(), expected),
            )),
            _ => Ok(object),
        },
        Reference::Value(other) => Err(ObjectError::InvalidConfiguration(format!(
            "invalid data type: {}. {} is expected",
            type_name(&other),
            expected.map_or("an object", Class::name)
        ))),
    }
}

fn build(
    runtime: &Rc<Runtime>,
    mut config: Config,
    expected: Option<&'static Class>,
    container: Option<&dyn Container>,
) -> Result<ObjectRef, ObjectError> {
    let class = match config.shift_remove("class") {
        Some(Value::String(class)) => class,
        Some(other) => {
            return Err(ObjectError::InvalidConfiguration(format!(
                "\"class\" must be a string, got {}",
                type_name(&other)
            )));
        }
        None => match expected {
            Some(expected) => expected.name().to_owned(),
            None => {
                return Err(ObjectError::InvalidConfiguration(
                    "object configuration must contain a \"class\" element".into(),
                ));
            }
        },
    };
    debug!(class = %class, "building object from descriptor");
    let object = match container {
        Some(container) => container.create(runtime, &class, &[], config)?,
        None => runtime.container()?.create(runtime, &class, &[], config)?,
    };
    check(&class, object, expected)
}

fn resolve(
    runtime: &Rc<Runtime>,
    instance: &Instance,
    expected: Option<&'static Class>,
    container: Option<&dyn Container>,
) -> Result<ObjectRef, ObjectError> {
    let resolved = match container {
        Some(container) => container.get(runtime, instance.id()),
        None => instance.get(runtime, None),
    };
    let object = resolved.map_err(|source| ObjectError::Instantiation {
        id: instance.id().to_owned(),
        source: Box::new(source),
    })?;
    check(instance.id(), object, expected)
}

fn check(
    id: &str,
    object: ObjectRef,
    expected: Option<&'static Class>,
) -> Result<ObjectRef, ObjectError> {
    match expected {
        Some(expected) if !object.is_a(expected) => Err(ObjectError::InvalidComponentType {
            id: id.to_owned(),
            actual: object.class().name().to_owned(),
            expected: expected.name().to_owned(),
        }),
        _ => Ok(object),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_normalize_to_ids_and_descriptors() {
        assert!(matches!(Reference::from(json!("db")), Reference::Id(id) if id == "db"));
        assert!(matches!(
            Reference::from(json!({"class": "Cache"})),
            Reference::Config(_)
        ));
        assert!(matches!(Reference::from(json!(3)), Reference::Value(_)));
    }

    #[test]
    fn empty_inputs_are_missing() {
        let runtime = Rc::new(Runtime::new());
        assert!(matches!(
            ensure(&runtime, Value::Null, None, None).unwrap_err(),
            ObjectError::MissingComponent
        ));
        assert!(matches!(
            ensure(&runtime, "", None, None).unwrap_err(),
            ObjectError::MissingComponent
        ));
    }

    #[test]
    fn scalars_are_invalid() {
        let runtime = Rc::new(Runtime::new());
        let err = ensure(&runtime, json!(true), None, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: invalid data type: boolean. an object is expected"
        );
    }

    #[test]
    fn descriptor_without_class_or_expected_type_fails() {
        let runtime = Rc::new(Runtime::new());
        let err = ensure(&runtime, json!({"size": 3}), None, None).unwrap_err();
        assert!(matches!(err, ObjectError::InvalidConfiguration(_)));
    }

    #[test]
    fn id_without_container_wraps_the_cause() {
        let runtime = Rc::new(Runtime::new());
        let err = ensure(&runtime, "cache", None, None).unwrap_err();
        match err {
            ObjectError::Instantiation { id, source } => {
                assert_eq!(id, "cache");
                assert!(source.to_string().contains("no default container"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
