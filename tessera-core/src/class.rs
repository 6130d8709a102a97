//! Type tags with explicit ancestry.
//!
//! Every object in the runtime reports a `&'static Class`. Type checks
//! ("is this a cache component?") and the class-level event tier both
//! match on tag identity walked through the ancestry, never on names.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A static type tag naming a class and its direct ancestors.
///
/// `parents` holds the base class first, followed by any capability tags
/// ("interfaces") the class satisfies.
///
/// ```
/// use tessera_core::class::{Class, OBJECT};
///
/// static CACHE: Class = Class::new("Cache", &[&OBJECT]);
/// static FILE_CACHE: Class = Class::new("FileCache", &[&CACHE]);
///
/// assert!(FILE_CACHE.is_a(&CACHE));
/// assert!(FILE_CACHE.is_a(&OBJECT));
/// assert!(!CACHE.is_a(&FILE_CACHE));
/// ```
pub struct Class {
    name: &'static str,
    parents: &'static [&'static Class],
}

/// Root tag shared by every object.
pub static OBJECT: Class = Class::root("Object");

impl Class {
    /// Create a tag with the given direct ancestors.
    pub const fn new(name: &'static str, parents: &'static [&'static Class]) -> Self {
        Self { name, parents }
    }

    /// Create a tag without ancestors.
    pub const fn root(name: &'static str) -> Self {
        Self { name, parents: &[] }
    }

    /// The class name, used in diagnostics and as a container lookup key.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Direct ancestors.
    pub fn parents(&self) -> &'static [&'static Class] {
        self.parents
    }

    /// Whether this class is `other` or descends from it.
    pub fn is_a(&self, other: &Class) -> bool {
        std::ptr::eq(self, other) || self.parents.iter().any(|parent| parent.is_a(other))
    }

    /// This class followed by all of its ancestors, breadth-first, each once.
    pub fn ancestry(&'static self) -> Vec<&'static Class> {
        let mut seen: Vec<&'static Class> = vec![self];
        let mut cursor = 0;
        while cursor < seen.len() {
            for parent in seen[cursor].parents {
                if !seen.iter().any(|known| std::ptr::eq(*known, *parent)) {
                    seen.push(parent);
                }
            }
            cursor += 1;
        }
        seen
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for Class {}

impl Hash for Class {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self, state);
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field(
                "parents",
                &self.parents.iter().map(|p| p.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
