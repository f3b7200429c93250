use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::rc::Rc;

use crate::token::Token;
use crate::value::Value;

/// A map key or set member.
///
/// Equality follows same-value-zero: primitives compare by value with
/// `NaN` equal to itself and `+0` equal to `-0`; tokens and objects compare
/// by identity.
#[derive(Clone, Debug)]
pub struct Key(Value);

impl Key {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => (a.is_nan() && b.is_nan()) || a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Token(a), Value::Token(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(&self.0).hash(state);
        match &self.0 {
            Value::Undefined | Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Number(n) => canonical_bits(*n).hash(state),
            Value::BigInt(n) => n.hash(state),
            Value::String(s) => s.hash(state),
            Value::Token(t) => t.hash(state),
            Value::Object(o) => o.addr().hash(state),
        }
    }
}

/// Bit pattern under which equal-by-same-value-zero numbers hash alike.
fn canonical_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0
    } else {
        n.to_bits()
    }
}

impl From<Value> for Key {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self(Value::from(s))
    }
}

/// The name of a record field: a string or a token.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Name(Rc<str>),
    Token(Token),
}

impl FieldKey {
    /// Coerce an arbitrary value to a field key.
    ///
    /// Strings and tokens map directly; everything else uses its
    /// property-name rendering (`1`, `1.5`, `NaN`, `true`, ...).
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => FieldKey::Name(s.clone()),
            Value::Token(t) => FieldKey::Token(t.clone()),
            other => FieldKey::Name(property_name(other).into()),
        }
    }

    /// The key as a value: names become strings, tokens stay tokens.
    pub fn to_value(&self) -> Value {
        match self {
            FieldKey::Name(name) => Value::String(name.clone()),
            FieldKey::Token(token) => Value::Token(token.clone()),
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            FieldKey::Name(name) => Some(name),
            FieldKey::Token(_) => None,
        }
    }
}

impl fmt::Debug for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Name(name) => write!(f, "{name:?}"),
            FieldKey::Token(token) => write!(f, "[{token}]"),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Name(name) => f.write_str(name),
            FieldKey::Token(token) => write!(f, "[{token}]"),
        }
    }
}

impl From<&str> for FieldKey {
    fn from(name: &str) -> Self {
        FieldKey::Name(name.into())
    }
}

impl From<String> for FieldKey {
    fn from(name: String) -> Self {
        FieldKey::Name(name.into())
    }
}

impl From<Token> for FieldKey {
    fn from(token: Token) -> Self {
        FieldKey::Token(token)
    }
}

impl From<usize> for FieldKey {
    fn from(index: usize) -> Self {
        FieldKey::Name(index.to_string().into())
    }
}

/// Render a non-string value the way it reads as a property name.
fn property_name(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".into(),
        Value::Null => "null".into(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(*n),
        Value::BigInt(n) => n.to_string(),
        Value::String(s) => s.to_string(),
        Value::Token(t) => t.to_string(),
        Value::Object(o) => format!("[object {}]", o.prototype()),
    }
}

/// Shortest textual form of a number: integral values carry no fraction.
pub(crate) fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".into()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".into() } else { "-Infinity".into() }
    } else if n == 0.0 {
        "0".into()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}
