//! Behaviors: attachable objects that extend a component.
//!
//! A behavior contributes its properties and methods to its owner's
//! fallback resolution and may subscribe handlers to the owner's events.
//! The subscriptions it declares are remembered at attach time, so detach
//! removes exactly what attach added.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use tessera_core::{Class, Config, OBJECT, Object, ObjectError, ObjectExt, PropertyResolver, Value};
use tracing::{debug, trace};

use crate::component::{ComponentRef, WeakComponentRef};
use crate::event::{Event, Handler};

/// Type tag for behaviors.
pub static BEHAVIOR: Class = Class::new("Behavior", &[&OBJECT]);

/// A behavior method usable as an event handler.
///
/// The behavior is mutably borrowed for the whole call. Work on `&mut B`
/// directly: reading one of the behavior's own properties back through
/// the owner (`event.sender`) fails with [`ObjectError::Reentrant`].
/// Detaching the behavior from its own handler is allowed; the `detached`
/// hook then runs once the handler returns.
pub type HandlerMethod<B> = fn(&mut B, &mut Event) -> Result<(), ObjectError>;

/// How a declared event binding is handled.
pub enum HandlerSpec<B> {
    /// A method on the behavior itself, identified by name. See
    /// [`HandlerMethod`] for what the method may do with its owner.
    Method(&'static str, HandlerMethod<B>),
    /// An arbitrary handler.
    Callable(Handler),
}

impl<B> HandlerSpec<B> {
    /// Bind to a behavior method.
    pub fn method(name: &'static str, method: HandlerMethod<B>) -> Self {
        Self::Method(name, method)
    }

    /// Bind to an arbitrary handler.
    pub fn callable(handler: Handler) -> Self {
        Self::Callable(handler)
    }
}

impl<B: Behavior> HandlerSpec<B> {
    fn bind(self, cell: &Weak<BehaviorCell>, target: usize) -> Handler {
        match self {
            Self::Method(name, method) => {
                let cell = cell.clone();
                Handler::method(target, name, move |event| {
                    let Some(cell) = cell.upgrade() else {
                        return Ok(());
                    };
                    BehaviorRef(cell).with_mut(|behavior: &mut B| method(behavior, event))?
                })
            }
            Self::Callable(handler) => handler,
        }
    }
}

impl<B> fmt::Debug for HandlerSpec<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method(name, _) => f.debug_tuple("Method").field(name).finish(),
            Self::Callable(handler) => f.debug_tuple("Callable").field(handler).finish(),
        }
    }
}

/// An object that can be attached to a component.
pub trait Behavior: Object {
    /// The owner events this behavior listens to, keyed by event name.
    ///
    /// Method handlers run with the behavior mutably borrowed, so they must
    /// not resolve this behavior's properties or methods through the owner.
    fn events(&self) -> Vec<(String, HandlerSpec<Self>)>
    where
        Self: Sized,
    {
        Vec::new()
    }

    /// Runs after the behavior's event bindings are installed on `owner`.
    ///
    /// The behavior itself is borrowed while this runs; reading the owner's
    /// properties is fine, resolving them back through this behavior is not.
    fn attached(&mut self, owner: &ComponentRef) -> Result<(), ObjectError> {
        let _ = owner;
        Ok(())
    }

    /// Runs after the behavior's event bindings are removed from its owner.
    fn detached(&mut self) {}
}

trait BehaviorObject: Object {
    fn bindings(&self, cell: &Weak<BehaviorCell>, target: usize) -> Vec<(String, Handler)>;
    fn attached_hook(&mut self, owner: &ComponentRef) -> Result<(), ObjectError>;
    fn detached_hook(&mut self);
}

impl<B: Behavior> BehaviorObject for B {
    fn bindings(&self, cell: &Weak<BehaviorCell>, target: usize) -> Vec<(String, Handler)> {
        self.events()
            .into_iter()
            .map(|(event, spec)| (event, spec.bind(cell, target)))
            .collect()
    }

    fn attached_hook(&mut self, owner: &ComponentRef) -> Result<(), ObjectError> {
        self.attached(owner)
    }

    fn detached_hook(&mut self) {
        self.detached();
    }
}

struct BehaviorCell {
    class: &'static Class,
    resolver: &'static dyn PropertyResolver,
    object: RefCell<Box<dyn BehaviorObject>>,
    owner: RefCell<Option<WeakComponentRef>>,
    bindings: RefCell<Vec<(String, Handler)>>,
    detach_pending: Cell<bool>,
}

/// A shared handle to a behavior instance.
///
/// Cloning the handle does not clone the behavior.
#[derive(Clone)]
pub struct BehaviorRef(Rc<BehaviorCell>);

impl BehaviorRef {
    /// Wrap a constructed behavior.
    pub fn new<B: Behavior>(behavior: B) -> Self {
        let class = behavior.class();
        let resolver = behavior.resolver();
        Self(Rc::new(BehaviorCell {
            class,
            resolver,
            object: RefCell::new(Box::new(behavior)),
            owner: RefCell::new(None),
            bindings: RefCell::new(Vec::new()),
            detach_pending: Cell::new(false),
        }))
    }

    /// Configure `behavior`, run its init hook, then wrap it.
    pub fn with_config<B: Behavior>(behavior: B, config: Config) -> Result<Self, ObjectError> {
        Ok(Self::new(tessera_core::construct(behavior, config)?))
    }

    /// The runtime type tag.
    pub fn class(&self) -> &'static Class {
        self.0.class
    }

    /// Whether both handles point at the same behavior.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn address(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    /// The component this behavior is attached to.
    pub fn owner(&self) -> Option<ComponentRef> {
        self.0.owner.borrow().as_ref().and_then(WeakComponentRef::upgrade)
    }

    /// Whether the behavior is currently attached.
    pub fn is_attached(&self) -> bool {
        self.owner().is_some()
    }

    /// The event bindings installed by the last attach.
    pub fn bindings(&self) -> Vec<(String, Handler)> {
        self.0.bindings.borrow().clone()
    }

    /// Attach to `owner`: record the owner, subscribe every declared
    /// handler to the owner's events, then run the `attached` hook.
    ///
    /// A behavior that is still attached elsewhere is detached first. When
    /// subscribing or the hook fails, the subscriptions made so far are
    /// removed and the behavior is left unattached.
    pub fn attach(&self, owner: &ComponentRef) -> Result<(), ObjectError> {
        if self.is_attached() {
            self.detach()?;
        }
        let bindings = {
            let guard = self.object()?;
            let object: &dyn BehaviorObject = &**guard;
            object.bindings(&Rc::downgrade(&self.0), self.address())
        };
        *self.0.owner.borrow_mut() = Some(owner.downgrade());
        if let Err(err) = self.install(owner, bindings) {
            self.rollback(owner);
            debug!(behavior = %self.class(), owner = %owner.class(), error = %err, "behavior attach failed");
            return Err(err);
        }
        debug!(behavior = %self.class(), owner = %owner.class(), "behavior attached");
        Ok(())
    }

    fn install(
        &self,
        owner: &ComponentRef,
        bindings: Vec<(String, Handler)>,
    ) -> Result<(), ObjectError> {
        for (event, handler) in bindings {
            owner.on(&event, handler.clone())?;
            self.0.bindings.borrow_mut().push((event, handler));
        }
        let mut guard = self.object_mut()?;
        let object: &mut dyn BehaviorObject = &mut **guard;
        object.attached_hook(owner)
    }

    /// Undo a partial [`attach`](Self::attach) without running any hook.
    fn rollback(&self, owner: &ComponentRef) {
        for (event, handler) in self.0.bindings.take() {
            if let Err(err) = owner.off(&event, Some(&handler)) {
                debug!(behavior = %self.class(), event = %event, error = %err, "rollback could not unsubscribe");
            }
        }
        *self.0.owner.borrow_mut() = None;
    }

    /// Detach from the owner: remove every handler installed by
    /// [`attach`](Self::attach), clear the owner, then run the `detached` hook.
    ///
    /// Does nothing when the behavior is not attached. When the behavior is
    /// busy (it is detaching itself from one of its own handlers or
    /// methods) the hook runs as soon as that call returns.
    pub fn detach(&self) -> Result<(), ObjectError> {
        let Some(owner) = self.0.owner.borrow().clone() else {
            return Ok(());
        };
        let bindings = self.0.bindings.take();
        if let Some(owner) = owner.upgrade() {
            for (event, handler) in &bindings {
                owner.off(event, Some(handler))?;
            }
        }
        *self.0.owner.borrow_mut() = None;
        match self.0.object.try_borrow_mut() {
            Ok(mut guard) => {
                let object: &mut dyn BehaviorObject = &mut **guard;
                object.detached_hook();
            }
            Err(_) => {
                trace!(behavior = %self.class(), "behavior busy, deferring detached hook");
                self.0.detach_pending.set(true);
            }
        }
        debug!(behavior = %self.class(), "behavior detached");
        Ok(())
    }

    /// Run a `detached` hook deferred by [`detach`](Self::detach) once the
    /// behavior is free again.
    fn settle(&self) {
        if !self.0.detach_pending.get() {
            return;
        }
        if let Ok(mut guard) = self.0.object.try_borrow_mut() {
            self.0.detach_pending.set(false);
            let object: &mut dyn BehaviorObject = &mut **guard;
            object.detached_hook();
        }
    }

    fn object(&self) -> Result<Ref<'_, Box<dyn BehaviorObject>>, ObjectError> {
        self.0
            .object
            .try_borrow()
            .map_err(|_| ObjectError::Reentrant(self.class().name().to_owned()))
    }

    fn object_mut(&self) -> Result<RefMut<'_, Box<dyn BehaviorObject>>, ObjectError> {
        self.0
            .object
            .try_borrow_mut()
            .map_err(|_| ObjectError::Reentrant(self.class().name().to_owned()))
    }

    /// Borrow the concrete behavior.
    pub fn with<B: Behavior, R>(&self, f: impl FnOnce(&B) -> R) -> Result<R, ObjectError> {
        let guard = self.object()?;
        let object: &dyn BehaviorObject = &**guard;
        let behavior = object
            .as_any()
            .downcast_ref::<B>()
            .ok_or_else(|| self.mismatch::<B>())?;
        Ok(f(behavior))
    }

    /// Mutably borrow the concrete behavior.
    pub fn with_mut<B: Behavior, R>(&self, f: impl FnOnce(&mut B) -> R) -> Result<R, ObjectError> {
        let result = {
            let mut guard = self.object_mut()?;
            let object: &mut dyn BehaviorObject = &mut **guard;
            let behavior = object
                .as_any_mut()
                .downcast_mut::<B>()
                .ok_or_else(|| self.mismatch::<B>())?;
            f(behavior)
        };
        self.settle();
        Ok(result)
    }

    fn mismatch<B>(&self) -> ObjectError {
        ObjectError::InvalidConfiguration(format!(
            "{} is not a {}",
            self.class(),
            std::any::type_name::<B>()
        ))
    }

    /// Read a property.
    pub fn get(&self, name: &str) -> Result<Value, ObjectError> {
        let guard = self.object()?;
        let object: &dyn BehaviorObject = &**guard;
        object.get_property(name)
    }

    /// Write a property.
    pub fn set(&self, name: &str, value: Value) -> Result<(), ObjectError> {
        let result = {
            let mut guard = self.object_mut()?;
            let object: &mut dyn BehaviorObject = &mut **guard;
            object.set_property(name, value)
        };
        self.settle();
        result
    }

    /// Whether the property is readable and non-null.
    pub fn is_set(&self, name: &str) -> Result<bool, ObjectError> {
        let guard = self.object()?;
        let object: &dyn BehaviorObject = &**guard;
        Ok(object.is_property_set(name))
    }

    /// Clear a property.
    pub fn unset(&self, name: &str) -> Result<(), ObjectError> {
        let mut guard = self.object_mut()?;
        let object: &mut dyn BehaviorObject = &mut **guard;
        object.unset_property(name)
    }

    /// Call a method.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, ObjectError> {
        let result = {
            let mut guard = self.object_mut()?;
            let object: &mut dyn BehaviorObject = &mut **guard;
            object.invoke(name, args)
        };
        self.settle();
        result
    }

    /// Whether the property can be read. Does not borrow the behavior.
    pub fn can_get_property(&self, name: &str, check_fields: bool) -> bool {
        self.0.resolver.can_get(name, check_fields)
    }

    /// Whether the property can be written. Does not borrow the behavior.
    pub fn can_set_property(&self, name: &str, check_fields: bool) -> bool {
        self.0.resolver.can_set(name, check_fields)
    }

    /// Whether the property is defined at all.
    pub fn has_property(&self, name: &str, check_fields: bool) -> bool {
        self.can_get_property(name, check_fields) || self.can_set_property(name, false)
    }

    /// Whether a method is declared. Does not borrow the behavior.
    pub fn has_method(&self, name: &str) -> bool {
        self.0.resolver.has_method(name)
    }
}

impl fmt::Debug for BehaviorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BehaviorRef({}@{:#x})", self.class(), self.address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::LazyLock;
    use tessera_core::AccessorTable;
    use tessera_core::value::decode;

    static STAMP: Class = Class::new("Stamp", &[&BEHAVIOR]);

    #[derive(Debug, Default)]
    struct Stamp {
        label: String,
        uses: u32,
    }

    impl Stamp {
        fn get_label(&self) -> Value {
            json!(self.label)
        }

        fn set_label(&mut self, value: Value) -> Result<(), ObjectError> {
            self.label = decode("Stamp", "label", value)?;
            Ok(())
        }

        fn apply(&mut self, _args: &[Value]) -> Result<Value, ObjectError> {
            self.uses += 1;
            Ok(json!(format!("[{}]", self.label)))
        }
    }

    impl Object for Stamp {
        fn class(&self) -> &'static Class {
            &STAMP
        }

        fn resolver(&self) -> &'static dyn PropertyResolver {
            static TABLE: LazyLock<AccessorTable<Stamp>> = LazyLock::new(|| {
                AccessorTable::new()
                    .property("label", Stamp::get_label, Stamp::set_label)
                    .method("apply", Stamp::apply)
            });
            &*TABLE
        }
    }

    impl Behavior for Stamp {}

    #[test]
    fn accessors_forward_to_the_behavior() {
        let stamp = BehaviorRef::new(Stamp::default());
        stamp.set("label", json!("ok")).unwrap();
        assert_eq!(stamp.get("label").unwrap(), json!("ok"));
        assert!(stamp.is_set("label").unwrap());
        assert_eq!(stamp.invoke("apply", &[]).unwrap(), json!("[ok]"));
        assert_eq!(stamp.with(|s: &Stamp| s.uses).unwrap(), 1);
    }

    #[test]
    fn capability_queries_use_the_table() {
        let stamp = BehaviorRef::new(Stamp::default());
        assert!(stamp.can_get_property("label", false));
        assert!(stamp.can_set_property("label", false));
        assert!(stamp.has_method("apply"));
        assert!(!stamp.has_property("ghost", true));
        assert!(stamp.class().is_a(&BEHAVIOR));
    }

    #[test]
    fn with_config_applies_entries() {
        let config = tessera_core::config::from_value(json!({"label": "x"})).unwrap();
        let stamp = BehaviorRef::with_config(Stamp::default(), config).unwrap();
        assert_eq!(stamp.get("label").unwrap(), json!("x"));
    }

    #[test]
    fn detach_without_owner_is_noop() {
        let stamp = BehaviorRef::new(Stamp::default());
        assert!(!stamp.is_attached());
        stamp.detach().unwrap();
        assert!(stamp.bindings().is_empty());
    }

    #[test]
    fn downcast_to_wrong_type_fails() {
        #[derive(Default)]
        struct Other;
        impl Object for Other {
            fn class(&self) -> &'static Class {
                &BEHAVIOR
            }
            fn resolver(&self) -> &'static dyn PropertyResolver {
                static TABLE: LazyLock<AccessorTable<Other>> = LazyLock::new(AccessorTable::new);
                &*TABLE
            }
        }
        impl Behavior for Other {}

        let stamp = BehaviorRef::new(Stamp::default());
        assert!(stamp.with(|_: &Other| ()).is_err());
    }

    #[test]
    fn reentrant_borrow_is_reported() {
        let stamp = BehaviorRef::new(Stamp::default());
        let inner = stamp.clone();
        let err = stamp
            .with_mut(|_: &mut Stamp| inner.get("label"))
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, ObjectError::Reentrant(_)));
    }
}
