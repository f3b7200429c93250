//! Value classification.

use std::fmt;

use overlay_types::{Boxed, Composite, Value};

/// The kind tag of a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Undefined,
    Null,
    Bool,
    Number,
    BigInt,
    String,
    Token,
    Record,
    Sequence,
    Map,
    Set,
    Boxed,
    Date,
    Pattern,
    Callable,
    Host,
    /// An object-like value of no recognised kind.
    Unsupported,
}

impl Kind {
    pub fn is_absent(self) -> bool {
        matches!(self, Kind::Undefined | Kind::Null)
    }

    pub fn is_composite(self) -> bool {
        !self.is_absent() && !self.is_primitive()
    }

    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            Kind::Bool | Kind::Number | Kind::BigInt | Kind::String | Kind::Token
        )
    }

    /// Composites passed through by reference instead of copied.
    pub fn is_passthrough(self) -> bool {
        matches!(self, Kind::Callable | Kind::Host)
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Undefined => "undefined",
            Kind::Null => "null",
            Kind::Bool => "boolean",
            Kind::Number => "number",
            Kind::BigInt => "bigint",
            Kind::String => "string",
            Kind::Token => "token",
            Kind::Record => "record",
            Kind::Sequence => "sequence",
            Kind::Map => "map",
            Kind::Set => "set",
            Kind::Boxed => "boxed scalar",
            Kind::Date => "date",
            Kind::Pattern => "pattern",
            Kind::Callable => "callable",
            Kind::Host => "host handle",
            Kind::Unsupported => "unsupported object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Determine the kind tag of a value. Only composites are inspected.
pub fn classify(value: &Value) -> Kind {
    match value {
        Value::Undefined => Kind::Undefined,
        Value::Null => Kind::Null,
        Value::Bool(_) => Kind::Bool,
        Value::Number(_) => Kind::Number,
        Value::BigInt(_) => Kind::BigInt,
        Value::String(_) => Kind::String,
        Value::Token(_) => Kind::Token,
        Value::Object(obj) => classify_composite(&obj.borrow()),
    }
}

pub(crate) fn classify_composite(composite: &Composite) -> Kind {
    match composite {
        Composite::Record(_) => Kind::Record,
        Composite::Sequence(_) => Kind::Sequence,
        Composite::Map(_) => Kind::Map,
        Composite::Set(_) => Kind::Set,
        Composite::Boxed(Boxed::Date(_)) => Kind::Date,
        Composite::Boxed(_) => Kind::Boxed,
        Composite::Pattern(_) => Kind::Pattern,
        Composite::Callable(_) => Kind::Callable,
        Composite::Host(_) => Kind::Host,
        Composite::Foreign(_) => Kind::Unsupported,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use overlay_types::{HostHandle, Pattern, Token, TypeDescriptor};

    #[test]
    fn primitives_and_absent() {
        assert_eq!(classify(&Value::Undefined), Kind::Undefined);
        assert_eq!(classify(&Value::Null), Kind::Null);
        assert_eq!(classify(&Value::from(true)), Kind::Bool);
        assert_eq!(classify(&Value::from(f64::NAN)), Kind::Number);
        assert_eq!(classify(&Value::bigint(7)), Kind::BigInt);
        assert_eq!(classify(&Value::from("abc")), Kind::String);
        assert_eq!(classify(&Value::Token(Token::new("u"))), Kind::Token);
        assert!(Kind::Null.is_absent());
        assert!(Kind::Token.is_primitive());
        assert!(!Kind::Undefined.is_composite());
    }

    #[test]
    fn composites() {
        let cases = [
            (Value::record([("a", 1)]), Kind::Record),
            (Value::sequence([1, 2]), Kind::Sequence),
            (Value::map([("k", 1)]), Kind::Map),
            (Value::set([1]), Kind::Set),
            (Value::boxed(Boxed::Number(3.0)), Kind::Boxed),
            (Value::date(Utc::now()), Kind::Date),
            (Value::pattern(Pattern::new("a+", "g")), Kind::Pattern),
            (Value::callable("f", |_| Value::Undefined), Kind::Callable),
            (
                Value::host(HostHandle::new(TypeDescriptor::new("HTMLElement"), ())),
                Kind::Host,
            ),
            (Value::foreign("WeakMap"), Kind::Unsupported),
        ];
        for (value, kind) in cases {
            assert_eq!(classify(&value), kind);
            assert!(kind.is_composite());
        }
    }

    #[test]
    fn passthrough_kinds() {
        assert!(Kind::Callable.is_passthrough());
        assert!(Kind::Host.is_passthrough());
        assert!(!Kind::Record.is_passthrough());
    }
}
