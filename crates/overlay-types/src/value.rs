//! The universal value type.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use num_bigint::BigInt;
use num_traits::Zero;

use crate::descriptor::{Prototype, TypeDescriptor};
use crate::key::{number_to_string, FieldKey, Key};
use crate::object::{
    Boxed, Callable, Composite, ForeignObject, HostHandle, MapObject, Object, Pattern, Record,
    Sequence, SetObject,
};
use crate::token::Token;

/// A dynamic value.
///
/// `Undefined` and `Null` are both *absent*: they are skipped when merging
/// but stay distinguishable as literal results. Everything except `Object`
/// is a primitive and is never combined with anything.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// A missing value.
    #[default]
    Undefined,
    /// An explicit empty marker.
    Null,
    Bool(bool),
    Number(f64),
    BigInt(Rc<BigInt>),
    String(Rc<str>),
    Token(Token),
    Object(Object),
}

impl Value {
    // ---------------------------------------------------------------
    // Builders
    // ---------------------------------------------------------------

    /// A plain record from `(name, value)` pairs.
    pub fn record<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<FieldKey>,
        V: Into<Value>,
    {
        Self::typed_record(Prototype::plain(), fields)
    }

    /// A record with an explicit prototype.
    pub fn typed_record<I, K, V>(prototype: impl Into<Prototype>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<FieldKey>,
        V: Into<Value>,
    {
        let fields: IndexMap<FieldKey, Value> = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::from_composite(Composite::Record(Record {
            prototype: prototype.into(),
            fields,
        }))
    }

    /// A dense sequence.
    pub fn sequence<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let items = items.into_iter().map(|v| Some(v.into())).collect();
        Self::from_composite(Composite::Sequence(Sequence::new(items)))
    }

    /// A sequence where `None` marks a hole.
    pub fn sparse_sequence(items: Vec<Option<Value>>) -> Self {
        Self::from_composite(Composite::Sequence(Sequence::new(items)))
    }

    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let entries: IndexMap<Key, Value> = entries
            .into_iter()
            .map(|(k, v)| (Key::new(k.into()), v.into()))
            .collect();
        Self::from_composite(Composite::Map(MapObject {
            family: TypeDescriptor::MAP,
            entries,
        }))
    }

    pub fn set<I, V>(members: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let members: IndexSet<Key> = members.into_iter().map(|v| Key::new(v.into())).collect();
        Self::from_composite(Composite::Set(SetObject {
            family: TypeDescriptor::SET,
            members,
        }))
    }

    pub fn boxed(boxed: Boxed) -> Self {
        Self::from_composite(Composite::Boxed(boxed))
    }

    pub fn date(at: DateTime<Utc>) -> Self {
        Self::boxed(Boxed::Date(at))
    }

    pub fn pattern(pattern: Pattern) -> Self {
        Self::from_composite(Composite::Pattern(pattern))
    }

    pub fn callable(name: &str, func: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Self::from_composite(Composite::Callable(Callable::new(name, func)))
    }

    pub fn host(handle: HostHandle) -> Self {
        Self::from_composite(Composite::Host(handle))
    }

    /// An object of an unrecognised kind.
    pub fn foreign(tag: impl Into<String>) -> Self {
        Self::from_composite(Composite::Foreign(ForeignObject::new(tag)))
    }

    pub fn bigint(n: impl Into<BigInt>) -> Self {
        Value::BigInt(Rc::new(n.into()))
    }

    pub fn from_composite(composite: Composite) -> Self {
        Value::Object(Object::new(composite))
    }

    // ---------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------

    /// `Undefined` or `Null`.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Present and not an object.
    pub fn is_primitive(&self) -> bool {
        !self.is_absent() && !self.is_object()
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Truthiness: `false`, `0`, `NaN`, `""`, `0n` and absent values are
    /// falsy; everything else, every object included, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::BigInt(n) => !n.is_zero(),
            Value::String(s) => !s.is_empty(),
            Value::Token(_) | Value::Object(_) => true,
        }
    }

    /// Identity comparison: objects and tokens by identity, other
    /// primitives by value (`NaN` equals itself, `+0` and `-0` differ).
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => same_number(*a, *b),
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Token(a), Value::Token(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Deep structural equality.
    ///
    /// Records compare their prototypes and field sets (order-insensitive),
    /// sequences compare element-wise including hole positions, maps and sets
    /// look members up by key. Cycles are handled: a pair of objects already
    /// under comparison is assumed equal.
    pub fn structurally_equal(&self, other: &Value) -> bool {
        let mut visiting = HashSet::new();
        structurally_equal_inner(self, other, &mut visiting)
    }

    /// Short name of the value's kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Token(_) => "token",
            Value::Object(o) => o.kind_name(),
        }
    }
}

fn same_number(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a.to_bits() == b.to_bits()
}

fn structurally_equal_inner(a: &Value, b: &Value, visiting: &mut HashSet<(usize, usize)>) -> bool {
    let (oa, ob) = match (a, b) {
        (Value::Object(oa), Value::Object(ob)) => (oa, ob),
        _ => return a.same(b),
    };
    if oa.ptr_eq(ob) || !visiting.insert((oa.addr(), ob.addr())) {
        return true;
    }

    let ca = oa.borrow();
    let cb = ob.borrow();
    match (&*ca, &*cb) {
        (Composite::Record(ra), Composite::Record(rb)) => {
            ra.prototype == rb.prototype
                && ra.fields.len() == rb.fields.len()
                && ra.fields.iter().all(|(k, va)| {
                    rb.fields
                        .get(k)
                        .is_some_and(|vb| structurally_equal_inner(va, vb, visiting))
                })
        }
        (Composite::Sequence(sa), Composite::Sequence(sb)) => {
            sa.family == sb.family
                && sa.items.len() == sb.items.len()
                && sa.items.iter().zip(&sb.items).all(|pair| match pair {
                    (None, None) => true,
                    (Some(va), Some(vb)) => structurally_equal_inner(va, vb, visiting),
                    _ => false,
                })
        }
        (Composite::Map(ma), Composite::Map(mb)) => {
            ma.family == mb.family
                && ma.entries.len() == mb.entries.len()
                && ma.entries.iter().all(|(k, va)| {
                    mb.entries
                        .get(k)
                        .is_some_and(|vb| structurally_equal_inner(va, vb, visiting))
                })
        }
        (Composite::Set(sa), Composite::Set(sb)) => {
            sa.family == sb.family
                && sa.members.len() == sb.members.len()
                && sa.members.iter().all(|m| sb.members.contains(m))
        }
        (Composite::Boxed(ba), Composite::Boxed(bb)) => match (ba, bb) {
            (Boxed::Number(x), Boxed::Number(y)) => same_number(*x, *y),
            _ => ba == bb,
        },
        (Composite::Pattern(pa), Composite::Pattern(pb)) => pa == pb,
        (Composite::Foreign(fa), Composite::Foreign(fb)) => fa.tag == fb.tag,
        // Callables and host handles are only ever equal to themselves.
        _ => false,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&number_to_string(*n)),
            Value::BigInt(n) => write!(f, "{n}n"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Token(t) => write!(f, "{t}"),
            Value::Object(o) => write!(f, "{o:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::BigInt(Rc::new(n))
    }
}

impl From<Token> for Value {
    fn from(t: Token) -> Self {
        Value::Token(t)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
