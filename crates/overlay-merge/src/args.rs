//! Argument filtering.
//!
//! Absent values are dropped; if nothing is left the last original argument
//! is the result. A primitive overwrites everything before it, so only the
//! run starting at the last primitive can take part in a merge.

use overlay_types::{FieldKey, Token, Value};

/// Outcome of filtering a merge argument list.
#[derive(Debug)]
pub(crate) enum Survivors {
    /// The merge is decided without building anything.
    Decided(Value),
    /// Arguments that take part in the merge. The last one is always an
    /// object; at most the first one is a primitive.
    Merge(Vec<Value>),
}

pub(crate) fn filter_args(values: &[Value]) -> Survivors {
    let present: Vec<&Value> = values.iter().filter(|v| !v.is_absent()).collect();

    match present.last() {
        // All absent: the original last argument, Undefined/Null preserved.
        None => return Survivors::Decided(values.last().cloned().unwrap_or_default()),
        Some(last) if !last.is_object() => return Survivors::Decided((*last).clone()),
        Some(_) => {}
    }

    let start = present.iter().rposition(|v| !v.is_object()).unwrap_or(0);
    Survivors::Merge(present[start..].iter().map(|v| (*v).clone()).collect())
}

/// Whether the most recent do-not-merge marker among `args` is truthy.
///
/// Only records carry the marker; an absent marker value does not reset an
/// earlier one.
pub(crate) fn replaces_predecessors(args: &[Value]) -> bool {
    let key = FieldKey::Token(Token::DONT_MERGE);
    let mut marker = Value::Undefined;
    for arg in args {
        let Some(obj) = arg.as_object() else { continue };
        if let Some(record) = obj.borrow().as_record() {
            match record.get(&key) {
                Some(v) if !v.is_absent() => marker = v.clone(),
                _ => {}
            }
        }
    }
    marker.is_truthy()
}
