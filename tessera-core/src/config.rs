//! Construction-time configuration.

use crate::error::ObjectError;
use crate::value::{Value, type_name};

/// An ordered `name → value` mapping applied through the property-write path.
///
/// Insertion order is preserved, so entries are applied in the order they
/// were written.
pub type Config = serde_json::Map<String, Value>;

/// Convert a JSON object literal into a [`Config`].
///
/// `Null` is accepted as the empty configuration.
///
/// ```
/// use serde_json::json;
/// use tessera_core::config;
///
/// let cfg = config::from_value(json!({"title": "Inbox", "width": 40})).unwrap();
/// let keys: Vec<_> = cfg.keys().map(String::as_str).collect();
/// assert_eq!(keys, vec!["title", "width"]);
/// ```
pub fn from_value(value: Value) -> Result<Config, ObjectError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Config::new()),
        other => Err(ObjectError::InvalidConfiguration(format!(
            "configuration must be a mapping, got {}",
            type_name(&other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_is_empty() {
        assert!(from_value(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn scalars_are_rejected() {
        let err = from_value(json!(3)).unwrap_err();
        assert!(err.to_string().contains("integer"));
    }

    #[test]
    fn order_is_preserved() {
        let cfg = from_value(json!({"z": 1, "a": 2, "m": 3})).unwrap();
        let keys: Vec<_> = cfg.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }
}
