//! ensure() tests: every kind of reference, resolved against a container.

use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;
use tessera_component::test_utils::{COUNTER, Counter, TALLY, Tally};
use tessera_component::{ComponentRef, Container, Locator, ObjectRef, Runtime};
use tessera_core::{Config, ObjectError, Value, config};
use tessera_di::{Instance, LocalContainer, Reference, ensure};

/// Counts every call that reaches the wrapped container.
struct CountingContainer {
    inner: LocalContainer,
    calls: Cell<usize>,
}

impl CountingContainer {
    fn new() -> Self {
        let inner = LocalContainer::new();
        inner.register_component::<Counter>();
        inner.register_behavior::<Tally>();
        Self {
            inner,
            calls: Cell::new(0),
        }
    }
}

impl Locator for CountingContainer {
    fn has(&self, id: &str) -> bool {
        self.calls.set(self.calls.get() + 1);
        self.inner.has(id)
    }

    fn get(&self, runtime: &Rc<Runtime>, id: &str) -> Result<ObjectRef, ObjectError> {
        self.calls.set(self.calls.get() + 1);
        self.inner.get(runtime, id)
    }
}

impl Container for CountingContainer {
    fn create(
        &self,
        runtime: &Rc<Runtime>,
        class: &str,
        params: &[Value],
        config: Config,
    ) -> Result<ObjectRef, ObjectError> {
        self.calls.set(self.calls.get() + 1);
        self.inner.create(runtime, class, params, config)
    }
}

fn runtime() -> (Rc<Runtime>, Rc<LocalContainer>) {
    let container = Rc::new(LocalContainer::new());
    container.register_component::<Counter>();
    container.register_behavior::<Tally>();
    let rt = Rc::new(Runtime::new().with_container(container.clone()));
    (rt, container)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Live objects
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn live_object_of_expected_type_is_returned_without_container_calls() {
    let (rt, _) = runtime();
    let counting = CountingContainer::new();
    let c = ComponentRef::new(&rt, Counter::new(), Config::new()).unwrap();

    let resolved = ensure(&rt, c.clone(), Some(&COUNTER), Some(&counting)).unwrap();
    assert!(resolved.as_component().unwrap().ptr_eq(&c));
    assert_eq!(counting.calls.get(), 0);
}

#[test]
fn live_object_without_expected_type_is_returned() {
    let rt = Rc::new(Runtime::new());
    let c = ComponentRef::new(&rt, Counter::new(), Config::new()).unwrap();
    let resolved = ensure(&rt, c.clone(), None, None).unwrap();
    assert!(resolved.as_component().unwrap().ptr_eq(&c));
}

#[test]
fn live_object_of_wrong_type_is_invalid() {
    let rt = Rc::new(Runtime::new());
    let c = ComponentRef::new(&rt, Counter::new(), Config::new()).unwrap();
    let err = ensure(&rt, c, Some(&TALLY), None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid configuration: invalid data type: Counter. Tally is expected"
    );
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Missing and malformed input
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn null_and_empty_id_are_missing() {
    let (rt, _) = runtime();
    for reference in [Reference::from(Value::Null), Reference::from("")] {
        let err = ensure(&rt, reference, Some(&COUNTER), None).unwrap_err();
        assert!(matches!(err, ObjectError::MissingComponent));
        assert_eq!(err.to_string(), "the required component is not specified");
    }
}

#[test]
fn numbers_and_arrays_are_invalid() {
    let (rt, _) = runtime();
    let err = ensure(&rt, json!(42), Some(&COUNTER), None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid configuration: invalid data type: integer. Counter is expected"
    );
    let err = ensure(&rt, json!([1, 2]), None, None).unwrap_err();
    assert!(matches!(err, ObjectError::InvalidConfiguration(_)));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Ids and deferred references
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn id_resolves_through_default_container() {
    let (rt, _) = runtime();
    let resolved = ensure(&rt, "Counter", Some(&COUNTER), None).unwrap();
    assert!(resolved.is_a(&COUNTER));
    let c = resolved.into_component().unwrap();
    assert!(c.with(|c: &Counter| c.initialized).unwrap());
}

#[test]
fn id_resolves_through_explicit_container() {
    let rt = Rc::new(Runtime::new());
    let counting = CountingContainer::new();
    let resolved = ensure(&rt, "Tally", Some(&TALLY), Some(&counting)).unwrap();
    assert!(resolved.as_behavior().is_some());
    assert_eq!(counting.calls.get(), 1);
}

#[test]
fn shared_instance_is_returned_by_id() {
    let (rt, container) = runtime();
    let c = ComponentRef::new(&rt, Counter::new(), Config::new()).unwrap();
    container.set_shared("counter", c.clone());

    let resolved = ensure(&rt, Instance::of("counter"), Some(&COUNTER), None).unwrap();
    assert!(resolved.as_component().unwrap().ptr_eq(&c));
}

#[test]
fn wrong_type_behind_id_names_all_parties() {
    let (rt, _) = runtime();
    let err = ensure(&rt, "Counter", Some(&TALLY), None).unwrap_err();
    match &err {
        ObjectError::InvalidComponentType {
            id,
            actual,
            expected,
        } => {
            assert_eq!(id, "Counter");
            assert_eq!(actual, "Counter");
            assert_eq!(expected, "Tally");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        err.to_string(),
        "\"Counter\" refers to a Counter component; Tally is expected"
    );
}

#[test]
fn unresolvable_id_is_wrapped_with_its_cause() {
    let (rt, _) = runtime();
    let err = ensure(&rt, "mailer", None, None).unwrap_err();
    match err {
        ObjectError::Instantiation { id, source } => {
            assert_eq!(id, "mailer");
            assert_eq!(source.to_string(), "unknown class or component id: mailer");
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Descriptors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn descriptor_builds_a_configured_object() {
    let rt = Rc::new(Runtime::new());
    let counting = CountingContainer::new();
    let cfg = config::from_value(json!({"class": "Counter", "count": 5})).unwrap();

    let resolved = ensure(&rt, cfg, None, Some(&counting)).unwrap();
    assert_eq!(resolved.get("count").unwrap(), json!(5));
    assert_eq!(counting.calls.get(), 1);
}

#[test]
fn descriptor_without_class_uses_expected_type() {
    let (rt, _) = runtime();
    let resolved = ensure(&rt, json!({"step": 4}), Some(&COUNTER), None).unwrap();
    assert_eq!(resolved.get("step").unwrap(), json!(4));
    assert_eq!(resolved.invoke("increment", &[]).unwrap(), json!(4));
}

#[test]
fn descriptor_of_wrong_type_is_rejected() {
    let (rt, _) = runtime();
    let err = ensure(&rt, json!({"class": "Tally"}), Some(&COUNTER), None).unwrap_err();
    assert!(matches!(err, ObjectError::InvalidComponentType { .. }));
}

#[test]
fn descriptor_configuration_errors_propagate() {
    let (rt, _) = runtime();
    let err = ensure(&rt, json!({"class": "Counter", "doubled": 1}), None, None).unwrap_err();
    assert!(matches!(err, ObjectError::ReadOnlyProperty { .. }));

    let err = ensure(&rt, json!({"class": "Widget"}), None, None).unwrap_err();
    assert!(matches!(err, ObjectError::UnknownClass(ref class) if class == "Widget"));
}
