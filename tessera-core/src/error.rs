//! Error taxonomy shared by every tessera crate.

use std::fmt;
use thiserror::Error;

/// The kind of property access that failed.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Reading a property.
    Get,
    /// Writing a property.
    Set,
    /// Clearing a property to null.
    Unset,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Access::Get => "getting",
            Access::Set => "setting",
            Access::Unset => "unsetting",
        })
    }
}

/// Errors raised by property access, method dispatch and object resolution.
///
/// Every error is raised at the access or resolution site and propagated
/// to the caller unchanged. Nothing is retried.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ObjectError {
    /// No getter, setter or field with this name, on the object or its behaviors.
    #[error("{access} unknown property: {class}::{name}")]
    UnknownProperty {
        /// What was attempted.
        access: Access,
        /// Class of the object.
        class: String,
        /// Property name.
        name: String,
    },

    /// A setter exists but no getter.
    #[error("getting write-only property: {class}::{name}")]
    WriteOnlyProperty {
        /// Class of the object.
        class: String,
        /// Property name.
        name: String,
    },

    /// A getter exists but no setter.
    #[error("{access} read-only property: {class}::{name}")]
    ReadOnlyProperty {
        /// What was attempted.
        access: Access,
        /// Class of the object.
        class: String,
        /// Property name.
        name: String,
    },

    /// No method with this name, on the object or its behaviors.
    #[error("calling unknown method: {class}::{name}()")]
    UnknownMethod {
        /// Class of the object.
        class: String,
        /// Method name.
        name: String,
    },

    /// A required reference was null or empty.
    #[error("the required component is not specified")]
    MissingComponent,

    /// A reference resolved to an object of the wrong class.
    #[error("\"{id}\" refers to a {actual} component; {expected} is expected")]
    InvalidComponentType {
        /// The identifier that was resolved.
        id: String,
        /// Class of the resolved object.
        actual: String,
        /// Class that was required.
        expected: String,
    },

    /// Input could not be interpreted as an object, reference or descriptor.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The container failed to produce the referenced object.
    #[error("failed to instantiate component or class \"{id}\"")]
    Instantiation {
        /// The identifier that was being resolved.
        id: String,
        /// The underlying failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A setter or method received a value it cannot accept.
    #[error("invalid value for {target}: {reason}")]
    InvalidValue {
        /// `Class::member` that rejected the value.
        target: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A container has no definition for the requested class or id.
    #[error("unknown class or component id: {0}")]
    UnknownClass(String),

    /// The object is already exclusively borrowed by a call in progress.
    #[error("re-entrant access to {0} while it is in use")]
    Reentrant(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ObjectError {
    /// Build an [`ObjectError::UnknownProperty`].
    pub fn unknown_property(access: Access, class: impl Into<String>, name: &str) -> Self {
        Self::UnknownProperty {
            access,
            class: class.into(),
            name: name.to_owned(),
        }
    }

    /// Build an [`ObjectError::WriteOnlyProperty`].
    pub fn write_only(class: impl Into<String>, name: &str) -> Self {
        Self::WriteOnlyProperty {
            class: class.into(),
            name: name.to_owned(),
        }
    }

    /// Build an [`ObjectError::ReadOnlyProperty`].
    pub fn read_only(access: Access, class: impl Into<String>, name: &str) -> Self {
        Self::ReadOnlyProperty {
            access,
            class: class.into(),
            name: name.to_owned(),
        }
    }

    /// Build an [`ObjectError::UnknownMethod`].
    pub fn unknown_method(class: impl Into<String>, name: &str) -> Self {
        Self::UnknownMethod {
            class: class.into(),
            name: name.to_owned(),
        }
    }

    /// Build an [`ObjectError::InvalidValue`] for `class::member`.
    pub fn invalid_value(class: &str, member: &str, reason: impl fmt::Display) -> Self {
        Self::InvalidValue {
            target: format!("{class}::{member}"),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn property_messages_name_class_and_access() {
        let err = ObjectError::read_only(Access::Set, "Widget", "id");
        assert_eq!(err.to_string(), "setting read-only property: Widget::id");

        let err = ObjectError::unknown_property(Access::Unset, "Widget", "ghost");
        assert_eq!(err.to_string(), "unsetting unknown property: Widget::ghost");

        let err = ObjectError::write_only("Widget", "secret");
        assert_eq!(err.to_string(), "getting write-only property: Widget::secret");
    }

    #[test]
    fn unknown_method_message() {
        let err = ObjectError::unknown_method("Widget", "explode");
        assert_eq!(err.to_string(), "calling unknown method: Widget::explode()");
    }

    #[test]
    fn instantiation_keeps_its_cause() {
        let cause = ObjectError::UnknownClass("db".into());
        let err = ObjectError::Instantiation {
            id: "db".into(),
            source: Box::new(cause),
        };
        assert!(err.to_string().contains("\"db\""));
        let source = err.source().expect("cause preserved");
        assert_eq!(source.to_string(), "unknown class or component id: db");
    }

    #[test]
    fn invalid_component_type_names_all_parties() {
        let err = ObjectError::InvalidComponentType {
            id: "cache".into(),
            actual: "Mailer".into(),
            expected: "Cache".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("cache"));
        assert!(msg.contains("Mailer"));
        assert!(msg.contains("Cache"));
    }
}
