//! Composite values and the shared [`Object`] handle.
//!
//! Composites are reference types: an [`Object`] is a cheap, clonable handle
//! to an interior-mutable [`Composite`]. Cloning the handle never copies the
//! contents, and two handles are the "same value" only when they point to the
//! same allocation.

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};

use crate::descriptor::{Prototype, TypeDescriptor};
use crate::key::{FieldKey, Key};
use crate::token::Token;
use crate::value::Value;

/// Shared handle to a composite value.
#[derive(Clone)]
pub struct Object(Rc<RefCell<Composite>>);

impl Object {
    pub fn new(composite: Composite) -> Self {
        Self(Rc::new(RefCell::new(composite)))
    }

    /// Borrow the composite immutably.
    ///
    /// # Panics
    ///
    /// Panics if the composite is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, Composite> {
        self.0.borrow()
    }

    /// Borrow the composite mutably.
    ///
    /// # Panics
    ///
    /// Panics if the composite is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, Composite> {
        self.0.borrow_mut()
    }

    /// Returns `true` if both handles point to the same composite.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared allocation, stable for the lifetime of the
    /// composite. Used as an identity key.
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    /// The prototype this composite reports for type resolution.
    pub fn prototype(&self) -> Prototype {
        self.borrow().prototype()
    }

    pub fn kind_name(&self) -> &'static str {
        self.borrow().kind_name()
    }
}

impl fmt::Debug for Object {
    // Shallow on purpose: composites may be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(composite) => write!(f, "Object({} @ {:#x})", composite.kind_name(), self.addr()),
            Err(_) => write!(f, "Object(<borrowed> @ {:#x})", self.addr()),
        }
    }
}

/// The closed set of composite kinds.
#[derive(Debug)]
pub enum Composite {
    /// Named-field container.
    Record(Record),
    /// Integer-indexed, possibly sparse container.
    Sequence(Sequence),
    /// Key-value container with arbitrary keys.
    Map(MapObject),
    /// Collection of unique values.
    Set(SetObject),
    /// A scalar wrapped as an object identity.
    Boxed(Boxed),
    /// Text pattern with flags and a cursor.
    Pattern(Pattern),
    /// Function-like value, always passed through by reference.
    Callable(Callable),
    /// Externally managed object, always passed through by reference.
    Host(HostHandle),
    /// An object-like value of a kind this model does not recognise.
    Foreign(ForeignObject),
}

impl Composite {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Composite::Record(_) => "Record",
            Composite::Sequence(_) => "Sequence",
            Composite::Map(_) => "Map",
            Composite::Set(_) => "Set",
            Composite::Boxed(Boxed::Date(_)) => "Date",
            Composite::Boxed(_) => "Boxed",
            Composite::Pattern(_) => "Pattern",
            Composite::Callable(_) => "Callable",
            Composite::Host(_) => "Host",
            Composite::Foreign(_) => "Foreign",
        }
    }

    /// The prototype used when resolving the type of a merge result.
    pub fn prototype(&self) -> Prototype {
        match self {
            Composite::Record(record) => record.prototype.clone(),
            Composite::Sequence(seq) => Prototype::Of(seq.family.clone()),
            Composite::Map(map) => Prototype::Of(map.family.clone()),
            Composite::Set(set) => Prototype::Of(set.family.clone()),
            Composite::Boxed(boxed) => Prototype::Of(boxed.descriptor()),
            Composite::Pattern(_) => Prototype::Of(TypeDescriptor::REGEXP),
            Composite::Callable(_) => Prototype::Of(TypeDescriptor::FUNCTION),
            Composite::Host(host) => Prototype::Of(host.descriptor.clone()),
            Composite::Foreign(foreign) => Prototype::Of(foreign.descriptor.clone()),
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Composite::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Composite::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapObject> {
        match self {
            Composite::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&SetObject> {
        match self {
            Composite::Set(set) => Some(set),
            _ => None,
        }
    }
}

/// A named-field container with a prototype.
#[derive(Debug, Default)]
pub struct Record {
    pub prototype: Prototype,
    /// Own fields in insertion order.
    pub fields: IndexMap<FieldKey, Value>,
}

impl Record {
    /// An empty plain record.
    pub fn plain() -> Self {
        Self::default()
    }

    /// An empty record with the given prototype.
    pub fn with_prototype(prototype: Prototype) -> Self {
        Self {
            prototype,
            fields: IndexMap::new(),
        }
    }

    pub fn get(&self, key: &FieldKey) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn insert(&mut self, key: FieldKey, value: Value) -> Option<Value> {
        self.fields.insert(key, value)
    }
}

/// An ordered, possibly sparse sequence. `None` slots are holes.
#[derive(Debug)]
pub struct Sequence {
    pub family: TypeDescriptor,
    pub items: Vec<Option<Value>>,
}

impl Sequence {
    pub fn new(items: Vec<Option<Value>>) -> Self {
        Self {
            family: TypeDescriptor::ARRAY,
            items,
        }
    }

    /// A sequence of `len` holes in the given family.
    pub fn holes(family: TypeDescriptor, len: usize) -> Self {
        Self {
            family,
            items: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Present (non-hole) items with their indices.
    pub fn present(&self) -> impl Iterator<Item = (usize, &Value)> {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (i, v)))
    }
}

/// A key-value container.
#[derive(Debug)]
pub struct MapObject {
    pub family: TypeDescriptor,
    pub entries: IndexMap<Key, Value>,
}

impl MapObject {
    pub fn new() -> Self {
        Self::empty(TypeDescriptor::MAP)
    }

    pub fn empty(family: TypeDescriptor) -> Self {
        Self {
            family,
            entries: IndexMap::new(),
        }
    }
}

impl Default for MapObject {
    fn default() -> Self {
        Self::new()
    }
}

/// A collection of unique members.
#[derive(Debug)]
pub struct SetObject {
    pub family: TypeDescriptor,
    pub members: IndexSet<Key>,
}

impl SetObject {
    pub fn new() -> Self {
        Self::empty(TypeDescriptor::SET)
    }

    pub fn empty(family: TypeDescriptor) -> Self {
        Self {
            family,
            members: IndexSet::new(),
        }
    }
}

impl Default for SetObject {
    fn default() -> Self {
        Self::new()
    }
}

/// A scalar wrapped as an object. Treated atomically and copied by value.
#[derive(Clone, Debug, PartialEq)]
pub enum Boxed {
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Date(DateTime<Utc>),
    /// Boxes the token itself; copying the box never mints a new token.
    Token(Token),
}

impl Boxed {
    pub fn descriptor(&self) -> TypeDescriptor {
        match self {
            Boxed::Bool(_) => TypeDescriptor::BOOLEAN,
            Boxed::Number(_) => TypeDescriptor::NUMBER,
            Boxed::String(_) => TypeDescriptor::STRING,
            Boxed::Date(_) => TypeDescriptor::DATE,
            Boxed::Token(_) => TypeDescriptor::SYMBOL,
        }
    }

    /// The wrapped primitive.
    pub fn unwrap_value(&self) -> Value {
        match self {
            Boxed::Bool(b) => Value::Bool(*b),
            Boxed::Number(n) => Value::Number(*n),
            Boxed::String(s) => Value::String(s.clone()),
            Boxed::Date(d) => Value::Number(d.timestamp_millis() as f64),
            Boxed::Token(t) => Value::Token(t.clone()),
        }
    }
}

/// A text pattern: source, flags and the cursor position of the last match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    pub source: String,
    pub flags: String,
    pub last_index: usize,
}

impl Pattern {
    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flags: flags.into(),
            last_index: 0,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

/// Signature of a callable's body.
pub type CallableFn = dyn Fn(&[Value]) -> Value;

/// A function-like value.
#[derive(Clone)]
pub struct Callable {
    name: Rc<str>,
    func: Rc<CallableFn>,
}

impl Callable {
    pub fn new(name: impl Into<Rc<str>>, func: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Self {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<callable {}>", self.name)
    }
}

/// An opaque, externally managed object (for example a UI node).
#[derive(Clone)]
pub struct HostHandle {
    descriptor: TypeDescriptor,
    inner: Rc<dyn Any>,
}

impl HostHandle {
    pub fn new<T: Any>(descriptor: TypeDescriptor, inner: T) -> Self {
        Self {
            descriptor,
            inner: Rc::new(inner),
        }
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }
}

impl fmt::Debug for HostHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<host {}>", self.descriptor)
    }
}

/// An object of an unrecognised kind, identified only by its tag.
#[derive(Clone, Debug)]
pub struct ForeignObject {
    pub tag: String,
    pub descriptor: TypeDescriptor,
}

impl ForeignObject {
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            descriptor: TypeDescriptor::new(tag.clone()),
            tag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_share_identity() {
        let a = Object::new(Composite::Record(Record::plain()));
        let b = a.clone();
        let c = Object::new(Composite::Record(Record::plain()));
        assert!(a.ptr_eq(&b));
        assert_eq!(a.addr(), b.addr());
        assert!(!a.ptr_eq(&c));
    }

    #[test]
    fn prototypes_per_kind() {
        let seq = Composite::Sequence(Sequence::new(Vec::new()));
        assert_eq!(seq.prototype(), Prototype::Of(TypeDescriptor::ARRAY));
        let date = Composite::Boxed(Boxed::Date(Utc::now()));
        assert_eq!(date.prototype(), Prototype::Of(TypeDescriptor::DATE));
        assert_eq!(date.kind_name(), "Date");
        let record = Composite::Record(Record::with_prototype(Prototype::Null));
        assert_eq!(record.prototype(), Prototype::Null);
    }

    #[test]
    fn sequence_present_skips_holes() {
        let seq = Sequence::new(vec![Some(Value::from(1)), None, Some(Value::from(3))]);
        let idx: Vec<usize> = seq.present().map(|(i, _)| i).collect();
        assert_eq!(idx, vec![0, 2]);
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn callable_invokes_body() {
        let double = Callable::new("double", |args: &[Value]| {
            Value::Number(args[0].as_number().unwrap_or_default() * 2.0)
        });
        assert_eq!(double.call(&[Value::from(21)]).as_number(), Some(42.0));
        assert_eq!(format!("{double:?}"), "<callable double>");
    }

    #[test]
    fn host_handle_downcasts() {
        let desc = TypeDescriptor::new("HTMLDivElement");
        let host = HostHandle::new(desc.clone(), String::from("div#root"));
        assert_eq!(host.descriptor(), &desc);
        assert_eq!(host.downcast_ref::<String>().map(String::as_str), Some("div#root"));
        assert!(host.downcast_ref::<u32>().is_none());
    }

    #[test]
    fn debug_is_shallow() {
        let obj = Object::new(Composite::Record(Record::plain()));
        let rendered = format!("{obj:?}");
        assert!(rendered.starts_with("Object(Record @ 0x"));
    }
}
