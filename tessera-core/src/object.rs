//! The accessor object: explicit, table-driven dynamic property access.
//!
//! A type opts in by implementing [`Object`]: it names its [`Class`] and
//! hands out a static [`AccessorTable`] listing its getters, setters,
//! declared fields and callable methods. [`ObjectExt`] then provides the
//! uniform `get`/`set`/`isset`/`unset`/`invoke` surface on top of that
//! table, with the failure modes of the error taxonomy.
//!
//! Resolution is two-phase by construction: this module is phase one (the
//! object's own table). Hosts that compose other objects (components with
//! behaviors) consult their delegates only after phase one misses, using
//! the instance-free capability queries on [`PropertyResolver`].

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use crate::class::Class;
use crate::config::Config;
use crate::error::{Access, ObjectError};
use crate::value::Value;

/// Reads a property.
pub type Getter<T> = fn(&T) -> Value;

/// Writes a property. `Value::Null` means "clear".
pub type Setter<T> = fn(&mut T, Value) -> Result<(), ObjectError>;

/// A dynamically callable method.
pub type Method<T> = fn(&mut T, &[Value]) -> Result<Value, ObjectError>;

/// Upcast helper so `dyn Object` can be downcast to its concrete type.
pub trait AsAny: Any {
    /// Borrow as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
    /// Borrow as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Instance-free capability queries plus erased dispatch.
///
/// Implemented by every [`AccessorTable`]. Capability queries never touch
/// an object instance, so a host can test a delegate's eligibility even
/// while that delegate is busy.
pub trait PropertyResolver: Send + Sync {
    /// Whether a getter named `name` is registered.
    fn has_getter(&self, name: &str) -> bool;

    /// Whether a setter named `name` is registered.
    fn has_setter(&self, name: &str) -> bool;

    /// Whether a directly declared field named `name` exists.
    fn has_field(&self, name: &str) -> bool;

    /// Whether a method named `name` is registered.
    fn has_method(&self, name: &str) -> bool;

    /// Readable through a getter, or through a field when `check_fields`.
    fn can_get(&self, name: &str, check_fields: bool) -> bool {
        self.has_getter(name) || (check_fields && self.has_field(name))
    }

    /// Writable through a setter, or through a field when `check_fields`.
    fn can_set(&self, name: &str, check_fields: bool) -> bool {
        self.has_setter(name) || (check_fields && self.has_field(name))
    }

    /// Read `name` from `target`. `None` when neither a getter nor a field exists.
    fn read(&self, target: &dyn Any, name: &str) -> Option<Value>;

    /// Write `name` on `target`. `None` when neither a setter nor a field exists.
    fn write(
        &self,
        target: &mut dyn Any,
        name: &str,
        value: Value,
    ) -> Option<Result<(), ObjectError>>;

    /// Call method `name` on `target`. `None` when no such method exists.
    fn call(
        &self,
        target: &mut dyn Any,
        name: &str,
        args: &[Value],
    ) -> Option<Result<Value, ObjectError>>;
}

/// The declared accessors of one concrete type.
///
/// Build once per type, typically in a `LazyLock`:
///
/// ```
/// use std::sync::LazyLock;
/// use serde_json::json;
/// use tessera_core::class::{Class, OBJECT};
/// use tessera_core::object::{AccessorTable, Object, ObjectExt, PropertyResolver};
/// use tessera_core::value::{decode, Value};
/// use tessera_core::ObjectError;
///
/// static POINT: Class = Class::new("Point", &[&OBJECT]);
///
/// #[derive(Default)]
/// struct Point { x: i64 }
///
/// impl Point {
///     fn get_x(&self) -> Value { json!(self.x) }
///     fn set_x(&mut self, v: Value) -> Result<(), ObjectError> {
///         self.x = decode("Point", "x", v)?;
///         Ok(())
///     }
/// }
///
/// impl Object for Point {
///     fn class(&self) -> &'static Class { &POINT }
///     fn resolver(&self) -> &'static dyn PropertyResolver {
///         static TABLE: LazyLock<AccessorTable<Point>> =
///             LazyLock::new(|| AccessorTable::new().property("x", Point::get_x, Point::set_x));
///         &*TABLE
///     }
/// }
///
/// let mut p = Point::default();
/// p.set_property("x", json!(3)).unwrap();
/// assert_eq!(p.get_property("x").unwrap(), json!(3));
/// ```
pub struct AccessorTable<T> {
    getters: HashMap<&'static str, Getter<T>>,
    setters: HashMap<&'static str, Setter<T>>,
    fields: HashMap<&'static str, (Getter<T>, Setter<T>)>,
    methods: HashMap<&'static str, Method<T>>,
}

impl<T> AccessorTable<T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            getters: HashMap::new(),
            setters: HashMap::new(),
            fields: HashMap::new(),
            methods: HashMap::new(),
        }
    }

    /// Register a getter.
    pub fn getter(mut self, name: &'static str, getter: Getter<T>) -> Self {
        self.getters.insert(name, getter);
        self
    }

    /// Register a setter.
    pub fn setter(mut self, name: &'static str, setter: Setter<T>) -> Self {
        self.setters.insert(name, setter);
        self
    }

    /// Register a getter/setter pair.
    pub fn property(self, name: &'static str, getter: Getter<T>, setter: Setter<T>) -> Self {
        self.getter(name, getter).setter(name, setter)
    }

    /// Register a directly declared field.
    ///
    /// Fields are readable and writable like properties, but capability
    /// queries only report them when asked to check fields.
    pub fn field(mut self, name: &'static str, getter: Getter<T>, setter: Setter<T>) -> Self {
        self.fields.insert(name, (getter, setter));
        self
    }

    /// Register a callable method.
    pub fn method(mut self, name: &'static str, method: Method<T>) -> Self {
        self.methods.insert(name, method);
        self
    }
}

impl<T> Default for AccessorTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for AccessorTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut getters: Vec<_> = self.getters.keys().collect();
        let mut setters: Vec<_> = self.setters.keys().collect();
        let mut fields: Vec<_> = self.fields.keys().collect();
        let mut methods: Vec<_> = self.methods.keys().collect();
        getters.sort();
        setters.sort();
        fields.sort();
        methods.sort();
        f.debug_struct("AccessorTable")
            .field("getters", &getters)
            .field("setters", &setters)
            .field("fields", &fields)
            .field("methods", &methods)
            .finish()
    }
}

impl<T: Any> PropertyResolver for AccessorTable<T> {
    fn has_getter(&self, name: &str) -> bool {
        self.getters.contains_key(name)
    }

    fn has_setter(&self, name: &str) -> bool {
        self.setters.contains_key(name)
    }

    fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    fn read(&self, target: &dyn Any, name: &str) -> Option<Value> {
        let target = target.downcast_ref::<T>()?;
        if let Some(getter) = self.getters.get(name) {
            return Some(getter(target));
        }
        self.fields.get(name).map(|(getter, _)| getter(target))
    }

    fn write(
        &self,
        target: &mut dyn Any,
        name: &str,
        value: Value,
    ) -> Option<Result<(), ObjectError>> {
        let target = target.downcast_mut::<T>()?;
        if let Some(setter) = self.setters.get(name) {
            return Some(setter(target, value));
        }
        self.fields.get(name).map(|(_, setter)| setter(target, value))
    }

    fn call(
        &self,
        target: &mut dyn Any,
        name: &str,
        args: &[Value],
    ) -> Option<Result<Value, ObjectError>> {
        let target = target.downcast_mut::<T>()?;
        self.methods.get(name).map(|method| method(target, args))
    }
}

/// An object with table-driven dynamic properties.
pub trait Object: AsAny {
    /// The runtime type tag.
    fn class(&self) -> &'static Class;

    /// The accessor table for this type.
    fn resolver(&self) -> &'static dyn PropertyResolver;

    /// Runs once after construction-time configuration has been applied.
    fn init(&mut self) -> Result<(), ObjectError> {
        Ok(())
    }
}

/// Uniform property and method access for every [`Object`].
pub trait ObjectExt: Object {
    /// Read a property.
    ///
    /// Fails with `WriteOnlyProperty` when only a setter exists, and
    /// `UnknownProperty` otherwise.
    fn get_property(&self, name: &str) -> Result<Value, ObjectError> {
        let resolver = self.resolver();
        if let Some(value) = resolver.read(self.as_any(), name) {
            return Ok(value);
        }
        if resolver.has_setter(name) {
            Err(ObjectError::write_only(self.class().name(), name))
        } else {
            Err(ObjectError::unknown_property(Access::Get, self.class().name(), name))
        }
    }

    /// Write a property.
    ///
    /// Fails with `ReadOnlyProperty` when only a getter exists, and
    /// `UnknownProperty` otherwise.
    fn set_property(&mut self, name: &str, value: Value) -> Result<(), ObjectError> {
        let resolver = self.resolver();
        let class = self.class();
        match resolver.write(self.as_any_mut(), name, value) {
            Some(result) => result,
            None if resolver.has_getter(name) => {
                Err(ObjectError::read_only(Access::Set, class.name(), name))
            }
            None => Err(ObjectError::unknown_property(Access::Set, class.name(), name)),
        }
    }

    /// Whether the property is readable and currently non-null.
    fn is_property_set(&self, name: &str) -> bool {
        self.resolver()
            .read(self.as_any(), name)
            .is_some_and(|value| !value.is_null())
    }

    /// Clear a property by writing null.
    ///
    /// Fails with `ReadOnlyProperty` when only a getter exists. Clearing a
    /// property the object does not know at all is a no-op.
    fn unset_property(&mut self, name: &str) -> Result<(), ObjectError> {
        let resolver = self.resolver();
        let class = self.class();
        match resolver.write(self.as_any_mut(), name, Value::Null) {
            Some(result) => result,
            None if resolver.has_getter(name) => {
                Err(ObjectError::read_only(Access::Unset, class.name(), name))
            }
            None => Ok(()),
        }
    }

    /// Call a declared method, or fail with `UnknownMethod`.
    fn invoke(&mut self, name: &str, args: &[Value]) -> Result<Value, ObjectError> {
        let resolver = self.resolver();
        let class = self.class();
        resolver
            .call(self.as_any_mut(), name, args)
            .unwrap_or_else(|| Err(ObjectError::unknown_method(class.name(), name)))
    }

    /// Whether the property can be read.
    fn can_get_property(&self, name: &str, check_fields: bool) -> bool {
        self.resolver().can_get(name, check_fields)
    }

    /// Whether the property can be written.
    fn can_set_property(&self, name: &str, check_fields: bool) -> bool {
        self.resolver().can_set(name, check_fields)
    }

    /// Whether the property is defined at all.
    fn has_property(&self, name: &str, check_fields: bool) -> bool {
        self.can_get_property(name, check_fields) || self.can_set_property(name, false)
    }

    /// Whether a method with this name is declared.
    fn has_method(&self, name: &str) -> bool {
        self.resolver().has_method(name)
    }

    /// Apply each configuration entry through [`set_property`](Self::set_property), in order.
    fn configure(&mut self, config: Config) -> Result<(), ObjectError> {
        for (name, value) in config {
            self.set_property(&name, value)?;
        }
        Ok(())
    }
}

impl<O: Object + ?Sized> ObjectExt for O {}

/// Configure `object` from `config`, then run its [`Object::init`] hook.
///
/// Any unknown or read-only key aborts construction with the matching
/// property error; `init` does not run in that case.
pub fn construct<T: Object>(mut object: T, config: Config) -> Result<T, ObjectError> {
    object.configure(config)?;
    object.init()?;
    Ok(object)
}
