//! Components: accessor objects with events and attachable behaviors.
//!
//! A live component is a [`ComponentRef`], a shared handle around the
//! user's domain object plus two private maps: event name to subscriptions,
//! and behavior key to attached behavior. The behavior map is materialized
//! from [`Component::behaviors`] the first time anything touches it.
//!
//! Property and method access resolves against the domain object's own
//! table first, then falls back to the attached behaviors in attach order.
//! No internal borrow is held while a handler, hook or behavior runs, so
//! handlers may freely use the component that triggered them.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use tessera_core::{
    Access, Class, Config, OBJECT, Object, ObjectError, PropertyResolver, Value,
};
use tracing::{debug, trace};

use crate::behavior::BehaviorRef;
use crate::event::{Event, Handler, Subscription};
use crate::locator::ObjectSpec;
use crate::runtime::Runtime;

/// Type tag for components.
pub static COMPONENT: Class = Class::new("Component", &[&OBJECT]);

/// Where a behavior lives in its owner's behavior map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BehaviorKey {
    /// A named slot. Attaching under a taken name replaces the occupant.
    Name(String),
    /// A positional slot. Attaching with any index appends a new slot.
    Index(usize),
}

impl From<&str> for BehaviorKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for BehaviorKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for BehaviorKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for BehaviorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "#{index}"),
        }
    }
}

/// A behavior to attach: an existing instance or something to build one from.
#[derive(Debug, Clone)]
pub enum BehaviorSpec {
    /// An already constructed behavior.
    Instance(BehaviorRef),
    /// Built through the runtime's default container.
    Object(ObjectSpec),
}

impl From<BehaviorRef> for BehaviorSpec {
    fn from(behavior: BehaviorRef) -> Self {
        Self::Instance(behavior)
    }
}

impl From<ObjectSpec> for BehaviorSpec {
    fn from(spec: ObjectSpec) -> Self {
        Self::Object(spec)
    }
}

impl From<&str> for BehaviorSpec {
    fn from(class: &str) -> Self {
        Self::Object(ObjectSpec::from(class))
    }
}

impl From<Config> for BehaviorSpec {
    fn from(config: Config) -> Self {
        Self::Object(ObjectSpec::Config(config))
    }
}

/// A domain type that can live inside a [`ComponentRef`].
///
/// `Clone` backs [`ComponentRef::duplicate`]: only the domain object is
/// cloned, never the subscriptions or the behaviors.
pub trait Component: Object + Clone {
    /// The behaviors every instance starts with.
    fn behaviors(&self) -> Vec<(BehaviorKey, BehaviorSpec)> {
        Vec::new()
    }
}

trait ComponentObject: Object {
    fn declared_behaviors(&self) -> Vec<(BehaviorKey, BehaviorSpec)>;
    fn clone_boxed(&self) -> Box<dyn ComponentObject>;
}

impl<C: Component> ComponentObject for C {
    fn declared_behaviors(&self) -> Vec<(BehaviorKey, BehaviorSpec)> {
        self.behaviors()
    }

    fn clone_boxed(&self) -> Box<dyn ComponentObject> {
        Box::new(self.clone())
    }
}

type BehaviorMap = Vec<(BehaviorKey, BehaviorRef)>;

struct ComponentCell {
    class: &'static Class,
    resolver: &'static dyn PropertyResolver,
    object: RefCell<Box<dyn ComponentObject>>,
    events: RefCell<HashMap<String, Vec<Subscription>>>,
    // `None` until materialized. Set to `Some` before declared behaviors
    // are attached so re-entrant calls see the map as present.
    behaviors: RefCell<Option<BehaviorMap>>,
    runtime: Weak<Runtime>,
}

/// A shared handle to a live component.
///
/// Cloning the handle does not clone the component; see
/// [`duplicate`](Self::duplicate) for that.
#[derive(Clone)]
pub struct ComponentRef(Rc<ComponentCell>);

/// A non-owning handle to a component.
#[derive(Clone)]
pub struct WeakComponentRef(Weak<ComponentCell>);

impl WeakComponentRef {
    /// The component, if it is still alive.
    pub fn upgrade(&self) -> Option<ComponentRef> {
        self.0.upgrade().map(ComponentRef)
    }
}

impl fmt::Debug for WeakComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(component) => write!(f, "WeakComponentRef({component:?})"),
            None => f.write_str("WeakComponentRef(<dropped>)"),
        }
    }
}

impl ComponentRef {
    /// Construct a component: apply `config` through [`set`](Self::set) in
    /// order, then run the init hook.
    ///
    /// Keys of the form `"as <name>"` attach the behavior described by the
    /// value under `<name>`. Configuration values cannot carry handlers, so
    /// `"on <event>"` keys are not recognized and fail like any other
    /// unknown property; subscribe with [`on`](Self::on) once the component
    /// is built.
    pub fn new<C: Component>(
        runtime: &Rc<Runtime>,
        component: C,
        config: Config,
    ) -> Result<Self, ObjectError> {
        let this = Self::from_boxed(Rc::downgrade(runtime), Box::new(component));
        this.configure(config)?;
        {
            let mut guard = this.object_mut()?;
            let object: &mut dyn ComponentObject = &mut **guard;
            object.init()?;
        }
        debug!(component = %this.class(), "component constructed");
        Ok(this)
    }

    fn from_boxed(runtime: Weak<Runtime>, object: Box<dyn ComponentObject>) -> Self {
        let class = (*object).class();
        let resolver = (*object).resolver();
        Self(Rc::new(ComponentCell {
            class,
            resolver,
            object: RefCell::new(object),
            events: RefCell::new(HashMap::new()),
            behaviors: RefCell::new(None),
            runtime,
        }))
    }

    /// Apply each entry through [`set`](Self::set), in order.
    pub fn configure(&self, config: Config) -> Result<(), ObjectError> {
        for (name, value) in config {
            self.set(&name, value)?;
        }
        Ok(())
    }

    /// The runtime type tag.
    pub fn class(&self) -> &'static Class {
        self.0.class
    }

    /// The runtime this component was created in, if it is still alive.
    pub fn runtime(&self) -> Option<Rc<Runtime>> {
        self.0.runtime.upgrade()
    }

    /// Whether both handles point at the same component.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// A non-owning handle.
    pub fn downgrade(&self) -> WeakComponentRef {
        WeakComponentRef(Rc::downgrade(&self.0))
    }

    /// A copy of this component with empty event and behavior maps.
    ///
    /// The domain object is cloned. Subscriptions and behaviors belong to
    /// exactly one owner and are not copied; the copy materializes its own
    /// declared behaviors when first touched.
    pub fn duplicate(&self) -> Result<Self, ObjectError> {
        let object = {
            let guard = self.object()?;
            let object: &dyn ComponentObject = &**guard;
            object.clone_boxed()
        };
        Ok(Self::from_boxed(self.0.runtime.clone(), object))
    }

    fn object(&self) -> Result<Ref<'_, Box<dyn ComponentObject>>, ObjectError> {
        self.0
            .object
            .try_borrow()
            .map_err(|_| ObjectError::Reentrant(self.class().name().to_owned()))
    }

    fn object_mut(&self) -> Result<RefMut<'_, Box<dyn ComponentObject>>, ObjectError> {
        self.0
            .object
            .try_borrow_mut()
            .map_err(|_| ObjectError::Reentrant(self.class().name().to_owned()))
    }

    /// Borrow the concrete domain object.
    pub fn with<C: Component, R>(&self, f: impl FnOnce(&C) -> R) -> Result<R, ObjectError> {
        let guard = self.object()?;
        let object: &dyn ComponentObject = &**guard;
        let component = object
            .as_any()
            .downcast_ref::<C>()
            .ok_or_else(|| self.mismatch::<C>())?;
        Ok(f(component))
    }

    /// Mutably borrow the concrete domain object.
    pub fn with_mut<C: Component, R>(&self, f: impl FnOnce(&mut C) -> R) -> Result<R, ObjectError> {
        let mut guard = self.object_mut()?;
        let object: &mut dyn ComponentObject = &mut **guard;
        let component = object
            .as_any_mut()
            .downcast_mut::<C>()
            .ok_or_else(|| self.mismatch::<C>())?;
        Ok(f(component))
    }

    fn mismatch<C>(&self) -> ObjectError {
        ObjectError::InvalidConfiguration(format!(
            "{} is not a {}",
            self.class(),
            std::any::type_name::<C>()
        ))
    }

    // --- Properties and methods ---

    /// Read a property from the component, or else from the first behavior
    /// that can provide it.
    pub fn get(&self, name: &str) -> Result<Value, ObjectError> {
        let resolver = self.0.resolver;
        if resolver.can_get(name, true) {
            let guard = self.object()?;
            let object: &dyn ComponentObject = &**guard;
            if let Some(value) = resolver.read(object.as_any(), name) {
                return Ok(value);
            }
        }
        for behavior in self.attached()? {
            if behavior.can_get_property(name, true) {
                trace!(component = %self.class(), behavior = %behavior.class(), property = name, "reading through behavior");
                return behavior.get(name);
            }
        }
        if resolver.has_setter(name) {
            Err(ObjectError::write_only(self.class().name(), name))
        } else {
            Err(ObjectError::unknown_property(Access::Get, self.class().name(), name))
        }
    }

    /// Write a property on the component, or else on the first behavior
    /// that accepts it.
    ///
    /// A name of the form `"as <name>"` attaches the behavior described by
    /// `value` under `<name>` instead.
    pub fn set(&self, name: &str, value: Value) -> Result<(), ObjectError> {
        if let Some(key) = name.strip_prefix("as ") {
            let spec = ObjectSpec::from_value(value)?;
            self.attach_behavior(key.trim(), spec)?;
            return Ok(());
        }
        let resolver = self.0.resolver;
        if resolver.can_set(name, true) {
            let mut guard = self.object_mut()?;
            let object: &mut dyn ComponentObject = &mut **guard;
            return resolver
                .write(object.as_any_mut(), name, value)
                .unwrap_or_else(|| {
                    Err(ObjectError::unknown_property(Access::Set, self.class().name(), name))
                });
        }
        for behavior in self.attached()? {
            if behavior.can_set_property(name, true) {
                trace!(component = %self.class(), behavior = %behavior.class(), property = name, "writing through behavior");
                return behavior.set(name, value);
            }
        }
        if resolver.has_getter(name) {
            Err(ObjectError::read_only(Access::Set, self.class().name(), name))
        } else {
            Err(ObjectError::unknown_property(Access::Set, self.class().name(), name))
        }
    }

    /// Whether the property is readable, on the component or a behavior,
    /// and currently non-null.
    pub fn is_set(&self, name: &str) -> Result<bool, ObjectError> {
        let resolver = self.0.resolver;
        if resolver.can_get(name, true) {
            let guard = self.object()?;
            let object: &dyn ComponentObject = &**guard;
            return Ok(resolver
                .read(object.as_any(), name)
                .is_some_and(|value| !value.is_null()));
        }
        for behavior in self.attached()? {
            if behavior.can_get_property(name, true) {
                return Ok(!behavior.get(name)?.is_null());
            }
        }
        Ok(false)
    }

    /// Clear a property by writing null, on the component or a behavior.
    ///
    /// Fails with `ReadOnlyProperty` when the property can be read but not
    /// written. Clearing a property nobody knows is a no-op.
    pub fn unset(&self, name: &str) -> Result<(), ObjectError> {
        let resolver = self.0.resolver;
        if resolver.can_set(name, true) {
            let mut guard = self.object_mut()?;
            let object: &mut dyn ComponentObject = &mut **guard;
            return resolver
                .write(object.as_any_mut(), name, Value::Null)
                .unwrap_or(Ok(()));
        }
        let behaviors = self.attached()?;
        for behavior in &behaviors {
            if behavior.can_set_property(name, true) {
                return behavior.set(name, Value::Null);
            }
        }
        let readable = resolver.has_getter(name)
            || behaviors.iter().any(|b| b.can_get_property(name, true));
        if readable {
            return Err(ObjectError::read_only(Access::Unset, self.class().name(), name));
        }
        Ok(())
    }

    /// Call a method on the component, or else on the first behavior that
    /// declares it.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, ObjectError> {
        let resolver = self.0.resolver;
        if resolver.has_method(name) {
            let mut guard = self.object_mut()?;
            let object: &mut dyn ComponentObject = &mut **guard;
            return resolver
                .call(object.as_any_mut(), name, args)
                .unwrap_or_else(|| Err(ObjectError::unknown_method(self.class().name(), name)));
        }
        for behavior in self.attached()? {
            if behavior.has_method(name) {
                trace!(component = %self.class(), behavior = %behavior.class(), method = name, "calling through behavior");
                return behavior.invoke(name, args);
            }
        }
        Err(ObjectError::unknown_method(self.class().name(), name))
    }

    /// Whether the property can be read, optionally counting declared
    /// fields and attached behaviors.
    pub fn can_get_property(
        &self,
        name: &str,
        check_fields: bool,
        check_behaviors: bool,
    ) -> Result<bool, ObjectError> {
        if self.0.resolver.can_get(name, check_fields) {
            return Ok(true);
        }
        if check_behaviors {
            return Ok(self
                .attached()?
                .iter()
                .any(|b| b.can_get_property(name, check_fields)));
        }
        Ok(false)
    }

    /// Whether the property can be written, optionally counting declared
    /// fields and attached behaviors.
    pub fn can_set_property(
        &self,
        name: &str,
        check_fields: bool,
        check_behaviors: bool,
    ) -> Result<bool, ObjectError> {
        if self.0.resolver.can_set(name, check_fields) {
            return Ok(true);
        }
        if check_behaviors {
            return Ok(self
                .attached()?
                .iter()
                .any(|b| b.can_set_property(name, check_fields)));
        }
        Ok(false)
    }

    /// Whether the property is defined at all.
    pub fn has_property(
        &self,
        name: &str,
        check_fields: bool,
        check_behaviors: bool,
    ) -> Result<bool, ObjectError> {
        Ok(self.can_get_property(name, check_fields, check_behaviors)?
            || self.can_set_property(name, false, check_behaviors)?)
    }

    /// Whether a method is declared, optionally counting attached behaviors.
    pub fn has_method(&self, name: &str, check_behaviors: bool) -> Result<bool, ObjectError> {
        if self.0.resolver.has_method(name) {
            return Ok(true);
        }
        if check_behaviors {
            return Ok(self.attached()?.iter().any(|b| b.has_method(name)));
        }
        Ok(false)
    }

    // --- Events ---

    /// Append a handler for `name`.
    pub fn on(&self, name: &str, handler: Handler) -> Result<(), ObjectError> {
        self.subscribe(name, handler, Value::Null, true)
    }

    /// Subscribe a handler with data, appending or prepending it.
    pub fn subscribe(
        &self,
        name: &str,
        handler: Handler,
        data: Value,
        append: bool,
    ) -> Result<(), ObjectError> {
        self.ensure_behaviors()?;
        let mut events = self.0.events.borrow_mut();
        let list = events.entry(name.to_owned()).or_default();
        let subscription = Subscription::new(handler, data);
        if append {
            list.push(subscription);
        } else {
            list.insert(0, subscription);
        }
        Ok(())
    }

    /// Remove handlers for `name`.
    ///
    /// With `None`, every handler for the event is removed. Otherwise every
    /// subscription of an equal handler is removed and the survivors keep
    /// their order. Returns whether anything was removed.
    pub fn off(&self, name: &str, handler: Option<&Handler>) -> Result<bool, ObjectError> {
        self.ensure_behaviors()?;
        let mut events = self.0.events.borrow_mut();
        let Some(list) = events.get_mut(name) else {
            return Ok(false);
        };
        let removed = match handler {
            None => {
                let existed = !list.is_empty();
                list.clear();
                existed
            }
            Some(handler) => {
                let before = list.len();
                list.retain(|s| s.handler != *handler);
                list.len() != before
            }
        };
        if list.is_empty() {
            events.remove(name);
        }
        Ok(removed)
    }

    /// Whether triggering `name` would run any handler, local or class-level.
    pub fn has_event_handlers(&self, name: &str) -> Result<bool, ObjectError> {
        self.ensure_behaviors()?;
        let local = self
            .0
            .events
            .borrow()
            .get(name)
            .is_some_and(|list| !list.is_empty());
        Ok(local
            || self
                .runtime()
                .is_some_and(|runtime| runtime.events().has_handlers(self.class(), name)))
    }

    /// Trigger `name` with a fresh event record.
    pub fn trigger(&self, name: &str) -> Result<(), ObjectError> {
        let mut event = Event::new();
        self.trigger_with(name, &mut event)
    }

    /// Trigger `name`, delivering `event` to the instance handlers and then
    /// to the class-level handlers.
    ///
    /// The first handler that leaves the event handled ends the trigger:
    /// neither the remaining instance handlers nor any class-level handler
    /// runs after it.
    pub fn trigger_with(&self, name: &str, event: &mut Event) -> Result<(), ObjectError> {
        self.ensure_behaviors()?;
        let local = self
            .0
            .events
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_default();
        if !local.is_empty() {
            event.begin(name, Some(self));
            if event.dispatch(&local)? {
                debug!(component = %self.class(), event = name, "event handled by instance handler");
                return Ok(());
            }
        }
        let Some(runtime) = self.runtime() else {
            return Ok(());
        };
        let global = runtime.events().handlers(self.class(), name);
        if !global.is_empty() {
            event.begin(name, Some(self));
            if event.dispatch(&global)? {
                debug!(component = %self.class(), event = name, "event handled by class handler");
            }
        }
        Ok(())
    }

    // --- Behaviors ---

    /// Materialize the declared behaviors, once.
    ///
    /// Calls made while materialization is in progress, from a behavior's
    /// attach for instance, see the partially built map and return at once.
    pub fn ensure_behaviors(&self) -> Result<(), ObjectError> {
        {
            let mut slot = self.0.behaviors.borrow_mut();
            if slot.is_some() {
                return Ok(());
            }
            *slot = Some(Vec::new());
        }
        let declared = match self.object() {
            Ok(guard) => {
                let object: &dyn ComponentObject = &**guard;
                object.declared_behaviors()
            }
            Err(err) => {
                *self.0.behaviors.borrow_mut() = None;
                return Err(err);
            }
        };
        debug!(component = %self.class(), count = declared.len(), "materializing behaviors");
        for (key, spec) in declared {
            self.attach_internal(key, spec)?;
        }
        Ok(())
    }

    fn attached(&self) -> Result<Vec<BehaviorRef>, ObjectError> {
        self.ensure_behaviors()?;
        Ok(self
            .0
            .behaviors
            .borrow()
            .iter()
            .flatten()
            .map(|(_, behavior)| behavior.clone())
            .collect())
    }

    fn lookup(&self, key: &BehaviorKey) -> Option<BehaviorRef> {
        self.0
            .behaviors
            .borrow()
            .iter()
            .flatten()
            .find(|(k, _)| k == key)
            .map(|(_, behavior)| behavior.clone())
    }

    /// Remove the entry under `key` without detaching it, returning its
    /// position and the behavior it held.
    fn vacate(&self, key: &BehaviorKey) -> Option<(usize, BehaviorRef)> {
        let mut slot = self.0.behaviors.borrow_mut();
        let list = slot.as_mut()?;
        let index = list.iter().position(|(k, _)| k == key)?;
        Some((index, list.remove(index).1))
    }

    /// Remove `behavior` from the map without detaching it.
    fn forget(&self, behavior: &BehaviorRef) {
        if let Some(list) = self.0.behaviors.borrow_mut().as_mut() {
            list.retain(|(_, b)| !b.ptr_eq(behavior));
        }
    }

    /// The behavior attached under `key`.
    pub fn behavior(&self, key: impl Into<BehaviorKey>) -> Result<Option<BehaviorRef>, ObjectError> {
        self.ensure_behaviors()?;
        Ok(self.lookup(&key.into()))
    }

    /// Every attached behavior with its key, in attach order.
    pub fn behaviors(&self) -> Result<Vec<(BehaviorKey, BehaviorRef)>, ObjectError> {
        self.ensure_behaviors()?;
        Ok(self.0.behaviors.borrow().clone().unwrap_or_default())
    }

    /// Attach a behavior under `key`, building it first if needed.
    ///
    /// A named key replaces, and detaches, the behavior already stored
    /// there; an index key appends a new slot. A behavior attached to
    /// another component is moved: detached there first.
    pub fn attach_behavior(
        &self,
        key: impl Into<BehaviorKey>,
        spec: impl Into<BehaviorSpec>,
    ) -> Result<BehaviorRef, ObjectError> {
        self.ensure_behaviors()?;
        self.attach_internal(key.into(), spec.into())
    }

    /// Attach several behaviors, in order.
    pub fn attach_behaviors<K, S>(
        &self,
        behaviors: impl IntoIterator<Item = (K, S)>,
    ) -> Result<(), ObjectError>
    where
        K: Into<BehaviorKey>,
        S: Into<BehaviorSpec>,
    {
        self.ensure_behaviors()?;
        for (key, spec) in behaviors {
            self.attach_internal(key.into(), spec.into())?;
        }
        Ok(())
    }

    fn attach_internal(
        &self,
        key: BehaviorKey,
        spec: BehaviorSpec,
    ) -> Result<BehaviorRef, ObjectError> {
        let behavior = match spec {
            BehaviorSpec::Instance(behavior) => behavior,
            BehaviorSpec::Object(spec) => self.instantiate_behavior(&spec)?,
        };
        if let Some(previous) = behavior.owner() {
            previous.forget(&behavior);
            behavior.detach()?;
        }
        match key {
            BehaviorKey::Index(_) => {
                behavior.attach(self)?;
                let mut slot = self.0.behaviors.borrow_mut();
                let list = slot.get_or_insert_with(Vec::new);
                let next = list
                    .iter()
                    .filter_map(|(k, _)| match k {
                        BehaviorKey::Index(index) => Some(index + 1),
                        BehaviorKey::Name(_) => None,
                    })
                    .max()
                    .unwrap_or(0);
                list.push((BehaviorKey::Index(next), behavior.clone()));
            }
            name @ BehaviorKey::Name(_) => {
                // The occupant leaves the map before it is detached, so a
                // failed attach below never leaves a detached entry behind.
                let position = self.vacate(&name);
                if let Some((_, current)) = &position {
                    current.detach()?;
                }
                behavior.attach(self)?;
                let mut slot = self.0.behaviors.borrow_mut();
                let list = slot.get_or_insert_with(Vec::new);
                let entry = (name, behavior.clone());
                match position {
                    Some((index, _)) if index <= list.len() => list.insert(index, entry),
                    _ => list.push(entry),
                }
            }
        }
        Ok(behavior)
    }

    fn instantiate_behavior(&self, spec: &ObjectSpec) -> Result<BehaviorRef, ObjectError> {
        let runtime = self.runtime().ok_or_else(|| ObjectError::Instantiation {
            id: spec.to_string(),
            source: Box::new(ObjectError::InvalidConfiguration(
                "the runtime has been dropped".into(),
            )),
        })?;
        let object = runtime.create_object(spec, &[])?;
        let class = object.class();
        object.into_behavior().ok_or_else(|| {
            ObjectError::InvalidConfiguration(format!("{class} is not a behavior"))
        })
    }

    /// Detach and return the behavior stored under `key`.
    pub fn detach_behavior(
        &self,
        key: impl Into<BehaviorKey>,
    ) -> Result<Option<BehaviorRef>, ObjectError> {
        self.ensure_behaviors()?;
        let key = key.into();
        let removed = {
            let mut slot = self.0.behaviors.borrow_mut();
            slot.as_mut().and_then(|list| {
                let index = list.iter().position(|(k, _)| *k == key)?;
                Some(list.remove(index).1)
            })
        };
        if let Some(behavior) = &removed {
            behavior.detach()?;
        }
        Ok(removed)
    }

    /// Detach every behavior.
    pub fn detach_behaviors(&self) -> Result<(), ObjectError> {
        self.ensure_behaviors()?;
        let all = self
            .0
            .behaviors
            .borrow_mut()
            .as_mut()
            .map(std::mem::take)
            .unwrap_or_default();
        for (_, behavior) in all {
            behavior.detach()?;
        }
        Ok(())
    }
}

impl fmt::Debug for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ComponentRef({}@{:p})",
            self.class(),
            Rc::as_ptr(&self.0).cast::<()>()
        )
    }
}
