//! Conversion between JSON text and [`Value`]s.

use overlay_merge::DEFAULT_MAX_DEPTH;
use overlay_types::{Boxed, Composite, FieldKey, Value};
use serde_json::{Map, Number, Value as Json};
use tracing::trace;

use crate::comment::is_comment;
use crate::error::{ConfigError, ConfigResult};

/// Parse JSON text, dropping comment entries at every level.
pub fn parse_config(text: &str) -> ConfigResult<Value> {
    parse_named(text, "<input>")
}

pub(crate) fn parse_named(text: &str, origin: &str) -> ConfigResult<Value> {
    let json: Json = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
        origin: origin.to_string(),
        source,
    })?;
    Ok(from_json(&json))
}

/// Build a [`Value`] from parsed JSON. Objects become plain records with
/// comment keys removed; arrays become dense sequences.
pub fn from_json(json: &Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        Json::String(s) => Value::from(s.as_str()),
        Json::Array(items) => Value::sequence(items.iter().map(from_json)),
        Json::Object(entries) => Value::record(entries.iter().filter_map(|(key, value)| {
            if is_comment(key) {
                trace!(key = %key, "dropping comment entry");
                None
            } else {
                Some((key.as_str(), from_json(value)))
            }
        })),
    }
}

/// Render a [`Value`] as JSON.
///
/// Boxed scalars unwrap, dates render as RFC 3339 strings, sets as arrays,
/// string-keyed maps as objects, and patterns as `/source/flags`. Holes and
/// non-finite numbers become `null`. Token-keyed record fields are skipped.
pub fn to_json(value: &Value) -> ConfigResult<Json> {
    render(value, 0)
}

fn render(value: &Value, depth: usize) -> ConfigResult<Json> {
    let obj = match value {
        Value::Undefined => return Err(ConfigError::unrepresentable("undefined")),
        Value::Null => return Ok(Json::Null),
        Value::Bool(b) => return Ok(Json::Bool(*b)),
        Value::Number(n) => return Ok(number(*n)),
        Value::String(s) => return Ok(Json::String(s.to_string())),
        Value::BigInt(_) => return Err(ConfigError::unrepresentable("bigint")),
        Value::Token(_) => return Err(ConfigError::unrepresentable("token")),
        Value::Object(obj) => obj,
    };
    if depth >= DEFAULT_MAX_DEPTH {
        return Err(ConfigError::TooDeep {
            limit: DEFAULT_MAX_DEPTH,
        });
    }

    let composite = obj.borrow();
    match &*composite {
        Composite::Record(record) => {
            let mut out = Map::new();
            for (key, field) in &record.fields {
                if let FieldKey::Name(name) = key {
                    out.insert(name.to_string(), render(field, depth + 1)?);
                }
            }
            Ok(Json::Object(out))
        }
        Composite::Sequence(seq) => seq
            .items
            .iter()
            .map(|slot| match slot {
                Some(item) => render(item, depth + 1),
                None => Ok(Json::Null),
            })
            .collect::<ConfigResult<Vec<_>>>()
            .map(Json::Array),
        Composite::Set(set) => set
            .members
            .iter()
            .map(|member| render(member.value(), depth + 1))
            .collect::<ConfigResult<Vec<_>>>()
            .map(Json::Array),
        Composite::Map(map) => {
            let mut out = Map::new();
            for (key, entry) in &map.entries {
                let Some(name) = key.value().as_str() else {
                    return Err(ConfigError::unrepresentable("map with non-string keys"));
                };
                out.insert(name.to_string(), render(entry, depth + 1)?);
            }
            Ok(Json::Object(out))
        }
        Composite::Boxed(Boxed::Date(at)) => Ok(Json::String(at.to_rfc3339())),
        Composite::Boxed(Boxed::Token(_)) => Err(ConfigError::unrepresentable("boxed token")),
        Composite::Boxed(boxed) => render(&boxed.unwrap_value(), depth + 1),
        Composite::Pattern(pattern) => Ok(Json::String(pattern.to_string())),
        Composite::Callable(_) | Composite::Host(_) | Composite::Foreign(_) => {
            Err(ConfigError::unrepresentable(composite.kind_name()))
        }
    }
}

/// Integral values render without a fraction.
fn number(n: f64) -> Json {
    const SAFE: f64 = 9_007_199_254_740_992.0;
    if n.fract() == 0.0 && n.abs() <= SAFE {
        Json::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map_or(Json::Null, Json::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::COMMENT_PREFIXES;
    use overlay_types::{HostHandle, Pattern, Token, TypeDescriptor};
    use serde_json::json;

    fn parses_to(text: &str, expected: &Value) {
        let parsed = parse_config(text).unwrap();
        assert!(parsed.structurally_equal(expected), "{text} -> {parsed}");
    }

    // -----------------------------------------------------------------------
    // Plain JSON
    // -----------------------------------------------------------------------

    #[test]
    fn string_literals() {
        parses_to(r#""a string value""#, &Value::from("a string value"));
        parses_to(r#""a str \t\n\\ value""#, &Value::from("a str \t\n\\ value"));
        parses_to(r#""""#, &Value::from(""));
    }

    #[test]
    fn numbers() {
        for (text, n) in [
            ("123", 123.0),
            ("-97", -97.0),
            ("0", 0.0),
            ("769.02", 769.02),
            ("-902.4", -902.4),
            ("-3.2e-40", -3.2e-40),
            ("7.6e80", 7.6e80),
        ] {
            assert_eq!(parse_config(text).unwrap().as_number(), Some(n), "{text}");
        }
    }

    #[test]
    fn null_and_booleans() {
        assert!(matches!(parse_config("null").unwrap(), Value::Null));
        assert_eq!(parse_config("true").unwrap().as_bool(), Some(true));
        assert_eq!(parse_config("false").unwrap().as_bool(), Some(false));
    }

    #[test]
    fn flat_arrays_and_objects() {
        parses_to(
            r#"[2.4, null, "text", null]"#,
            &Value::sequence([2.4.into(), Value::Null, "text".into(), Value::Null]),
        );
        parses_to("[]", &Value::sequence(Vec::<Value>::new()));
        parses_to(
            r#"{"a": 4.5, "b": null, "c": "str"}"#,
            &Value::record([("a", 4.5.into()), ("b", Value::Null), ("c", "str".into())]),
        );
        parses_to("{}", &Value::record(Vec::<(&str, Value)>::new()));
    }

    #[test]
    fn nested_structures() {
        let expected = Value::record([
            ("a", Value::from(54)),
            ("d", Value::Null),
            (
                "c",
                Value::sequence([
                    Value::from(-0.2),
                    Value::from("qw"),
                    Value::record([
                        ("a", Value::from("\\\t")),
                        ("abc", Value::sequence(Vec::<Value>::new())),
                    ]),
                ]),
            ),
            (
                "e",
                Value::record([("w", Value::record(Vec::<(&str, Value)>::new()))]),
            ),
        ]);
        parses_to(
            r#"{"a": 54, "d": null, "c": [-0.2, "qw", {"a": "\\\t", "abc": []}], "e": {"w": {}}}"#,
            &expected,
        );
    }

    #[test]
    fn key_order_is_preserved() {
        let parsed = parse_config(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let obj = parsed.as_object().unwrap();
        let composite = obj.borrow();
        let keys: Vec<String> = composite
            .as_record()
            .unwrap()
            .fields
            .keys()
            .map(ToString::to_string)
            .collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = parse_config("{\"a\": }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref origin, .. } if origin == "<input>"));
    }

    // -----------------------------------------------------------------------
    // Comment stripping
    // -----------------------------------------------------------------------

    #[test]
    fn comment_only_object_becomes_empty() {
        for prefix in COMMENT_PREFIXES {
            let key = format!("{prefix}xyz");
            let text = json!({ key: -3.4 }).to_string();
            parses_to(&text, &Value::record(Vec::<(&str, Value)>::new()));
        }
    }

    #[test]
    fn comments_are_stripped_from_normal_objects() {
        for prefix in COMMENT_PREFIXES {
            let key = format!("{prefix}xyz");
            let text = json!({
                "attr": { "y": [""] },
                "normal": [{ "t": 0 }],
                key: { "q": 8, "i": [2, "a"] },
            })
            .to_string();
            let expected = Value::record([
                ("attr", Value::record([("y", Value::sequence([""]))])),
                ("normal", Value::sequence([Value::record([("t", 0)])])),
            ]);
            parses_to(&text, &expected);
        }
    }

    #[test]
    fn nested_comments_are_stripped() {
        parses_to(
            r##"{"outer": {"# note": 1, "keep": [{"// x": 2, "y": 3}]}}"##,
            &Value::record([(
                "outer",
                Value::record([("keep", Value::sequence([Value::record([("y", 3)])]))]),
            )]),
        );
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    #[test]
    fn parsed_config_renders_back() {
        let source = json!({
            "name": "svc",
            "port": 8080,
            "ratio": 0.25,
            "tags": ["a", null, true],
            "nested": { "deep": { "n": -3 } }
        });
        let value = from_json(&source);
        assert_eq!(to_json(&value).unwrap(), source);
    }

    #[test]
    fn non_json_kinds_render() {
        let value = Value::record([
            ("set", Value::set(["x", "y"])),
            ("map", Value::map([("k", 1)])),
            ("pattern", Value::pattern(Pattern::new("a+", "g"))),
            ("boxed", Value::boxed(Boxed::Number(2.5))),
            ("holes", Value::sparse_sequence(vec![None, Some(1.into())])),
            ("nan", Value::from(f64::NAN)),
        ]);
        if let Some(obj) = value.as_object() {
            if let Composite::Record(record) = &mut *obj.borrow_mut() {
                record.insert(FieldKey::Token(Token::new("hidden")), Value::from(1));
            }
        }
        assert_eq!(
            to_json(&value).unwrap(),
            json!({
                "set": ["x", "y"],
                "map": { "k": 1 },
                "pattern": "/a+/g",
                "boxed": 2.5,
                "holes": [null, 1],
                "nan": null
            })
        );
    }

    #[test]
    fn unrepresentable_kinds_are_rejected() {
        let host = Value::host(HostHandle::new(TypeDescriptor::new("Canvas"), ()));
        for value in [
            Value::Undefined,
            Value::Token(Token::new("t")),
            Value::bigint(7),
            Value::callable("f", |_| Value::Null),
            Value::record([("node", host)]),
            Value::map([(1, 2)]),
            Value::foreign("WeakSet"),
        ] {
            assert!(
                matches!(to_json(&value), Err(ConfigError::Unrepresentable { .. })),
                "{value}"
            );
        }
    }

    #[test]
    fn cycles_hit_the_depth_guard() {
        let node = Value::record([("name", "loop")]);
        if let Some(obj) = node.as_object() {
            if let Composite::Record(record) = &mut *obj.borrow_mut() {
                record.insert(FieldKey::from("me"), node.clone());
            }
        }
        assert!(matches!(
            to_json(&node),
            Err(ConfigError::TooDeep { limit }) if limit == DEFAULT_MAX_DEPTH
        ));
    }
}
