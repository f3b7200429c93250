use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

/// Ids below this value are reserved for the built-in descriptors.
const FIRST_USER_ID: u64 = 1024;

static NEXT_DESCRIPTOR_ID: AtomicU64 = AtomicU64::new(FIRST_USER_ID);

/// Nominal type identity of a composite value.
///
/// A `TypeDescriptor` is an opaque, comparable handle. Two descriptors are
/// equal only if they were produced by the same call to [`TypeDescriptor::new`]
/// (or are the same built-in constant); the name is informational and two
/// user types may share one.
///
/// A descriptor is *constructible* when an empty instance can be made for it
/// generically. Records whose type is not constructible are copied as plain
/// records.
#[derive(Clone)]
pub struct TypeDescriptor {
    id: u64,
    name: Cow<'static, str>,
    constructible: bool,
}

impl TypeDescriptor {
    /// Plain, untyped records.
    pub const OBJECT: Self = Self::builtin(1, "Object");
    pub const ARRAY: Self = Self::builtin(2, "Array");
    pub const MAP: Self = Self::builtin(3, "Map");
    pub const SET: Self = Self::builtin(4, "Set");
    pub const BOOLEAN: Self = Self::builtin(5, "Boolean");
    pub const NUMBER: Self = Self::builtin(6, "Number");
    pub const STRING: Self = Self::builtin(7, "String");
    pub const DATE: Self = Self::builtin(8, "Date");
    pub const SYMBOL: Self = Self::builtin(9, "Symbol");
    pub const REGEXP: Self = Self::builtin(10, "RegExp");
    pub const FUNCTION: Self = Self::builtin(11, "Function");

    const fn builtin(id: u64, name: &'static str) -> Self {
        Self {
            id,
            name: Cow::Borrowed(name),
            constructible: true,
        }
    }

    /// Register a new constructible user type.
    pub fn new(name: impl Into<String>) -> Self {
        Self::allocate(name.into(), true)
    }

    /// Register a new user type that cannot be instantiated generically.
    pub fn abstract_type(name: impl Into<String>) -> Self {
        Self::allocate(name.into(), false)
    }

    fn allocate(name: String, constructible: bool) -> Self {
        Self {
            id: NEXT_DESCRIPTOR_ID.fetch_add(1, Ordering::Relaxed),
            name: Cow::Owned(name),
            constructible,
        }
    }

    /// The process-unique id of this descriptor.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether an empty instance can be created for this type.
    pub fn is_constructible(&self) -> bool {
        self.constructible
    }

    /// Returns `true` for the descriptors defined as constants on this type.
    pub fn is_builtin(&self) -> bool {
        self.id < FIRST_USER_ID
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({}#{})", self.name, self.id)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The prototype of a record: either a type descriptor or the explicit
/// "no prototype" sentinel.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Prototype {
    /// No prototype at all. Never weak, never constructible.
    Null,
    /// Instances of the given type.
    Of(TypeDescriptor),
}

impl Prototype {
    /// Prototype of plain records.
    pub const fn plain() -> Self {
        Prototype::Of(TypeDescriptor::OBJECT)
    }

    pub fn descriptor(&self) -> Option<&TypeDescriptor> {
        match self {
            Prototype::Null => None,
            Prototype::Of(desc) => Some(desc),
        }
    }

    pub fn is_constructible(&self) -> bool {
        self.descriptor().is_some_and(TypeDescriptor::is_constructible)
    }
}

impl Default for Prototype {
    fn default() -> Self {
        Self::plain()
    }
}

impl From<TypeDescriptor> for Prototype {
    fn from(desc: TypeDescriptor) -> Self {
        Prototype::Of(desc)
    }
}

impl fmt::Display for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prototype::Null => f.write_str("null"),
            Prototype::Of(desc) => write!(f, "{desc}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_types_are_distinct_even_with_equal_names() {
        let a = TypeDescriptor::new("Point");
        let b = TypeDescriptor::new("Point");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn builtins_compare_by_id() {
        assert_eq!(TypeDescriptor::OBJECT, TypeDescriptor::OBJECT);
        assert_ne!(TypeDescriptor::OBJECT, TypeDescriptor::ARRAY);
        assert!(TypeDescriptor::MAP.is_builtin());
        assert!(!TypeDescriptor::new("Custom").is_builtin());
    }

    #[test]
    fn abstract_types_are_not_constructible() {
        let desc = TypeDescriptor::abstract_type("Shape");
        assert!(!desc.is_constructible());
        assert!(!Prototype::Of(desc).is_constructible());
        assert!(!Prototype::Null.is_constructible());
        assert!(Prototype::plain().is_constructible());
    }

    #[test]
    fn display_uses_name() {
        let desc = TypeDescriptor::new("Widget");
        assert_eq!(desc.to_string(), "Widget");
        assert_eq!(Prototype::Null.to_string(), "null");
        assert_eq!(Prototype::Of(desc).to_string(), "Widget");
    }
}
