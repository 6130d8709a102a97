//! A handle to any runtime-managed object.

use tessera_core::{Class, ObjectError, Value};

use crate::behavior::BehaviorRef;
use crate::component::ComponentRef;

/// Either a component or a behavior.
///
/// This is what containers and locators hand out. Accessor calls are
/// forwarded to the underlying handle.
#[derive(Debug, Clone)]
pub enum ObjectRef {
    /// A component handle.
    Component(ComponentRef),
    /// A behavior handle.
    Behavior(BehaviorRef),
}

impl ObjectRef {
    /// The runtime type tag.
    pub fn class(&self) -> &'static Class {
        match self {
            Self::Component(c) => c.class(),
            Self::Behavior(b) => b.class(),
        }
    }

    /// Whether the object's class is `class` or descends from it.
    pub fn is_a(&self, class: &Class) -> bool {
        self.class().is_a(class)
    }

    /// Whether both handles point at the same instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Component(a), Self::Component(b)) => a.ptr_eq(b),
            (Self::Behavior(a), Self::Behavior(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Borrow as a component handle.
    pub fn as_component(&self) -> Option<&ComponentRef> {
        match self {
            Self::Component(c) => Some(c),
            Self::Behavior(_) => None,
        }
    }

    /// Borrow as a behavior handle.
    pub fn as_behavior(&self) -> Option<&BehaviorRef> {
        match self {
            Self::Behavior(b) => Some(b),
            Self::Component(_) => None,
        }
    }

    /// Convert into a component handle.
    pub fn into_component(self) -> Option<ComponentRef> {
        match self {
            Self::Component(c) => Some(c),
            Self::Behavior(_) => None,
        }
    }

    /// Convert into a behavior handle.
    pub fn into_behavior(self) -> Option<BehaviorRef> {
        match self {
            Self::Behavior(b) => Some(b),
            Self::Component(_) => None,
        }
    }

    /// Read a property.
    pub fn get(&self, name: &str) -> Result<Value, ObjectError> {
        match self {
            Self::Component(c) => c.get(name),
            Self::Behavior(b) => b.get(name),
        }
    }

    /// Write a property.
    pub fn set(&self, name: &str, value: Value) -> Result<(), ObjectError> {
        match self {
            Self::Component(c) => c.set(name, value),
            Self::Behavior(b) => b.set(name, value),
        }
    }

    /// Call a method.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, ObjectError> {
        match self {
            Self::Component(c) => c.invoke(name, args),
            Self::Behavior(b) => b.invoke(name, args),
        }
    }
}

impl From<ComponentRef> for ObjectRef {
    fn from(component: ComponentRef) -> Self {
        Self::Component(component)
    }
}

impl From<BehaviorRef> for ObjectRef {
    fn from(behavior: BehaviorRef) -> Self {
        Self::Behavior(behavior)
    }
}
