//! Dynamic property values.
//!
//! Property values, method arguments and configuration entries are all
//! `serde_json::Value`. `Value::Null` plays the role of "absent": a
//! property is considered set only when its getter yields something else.
//! Typed accessors convert at the boundary with [`decode`] and [`encode`].

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ObjectError;

pub use serde_json::Value;

/// Decode `value` into `T` for the member `class::member`.
///
/// Fails with [`ObjectError::InvalidValue`] when the value has the wrong shape.
pub fn decode<T: DeserializeOwned>(class: &str, member: &str, value: Value) -> Result<T, ObjectError> {
    serde_json::from_value(value).map_err(|e| ObjectError::invalid_value(class, member, e))
}

/// Encode a typed value for return from a getter or method.
///
/// Values that cannot be represented (maps with non-string keys) become `Null`.
pub fn encode<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// The runtime type name of a value, for diagnostics.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "double",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}
