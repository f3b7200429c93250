//! State merging: populate a shell from the surviving arguments.
//!
//! The strategy is picked by the shell's kind:
//!
//! - records and maps collect per-key contributions from every argument and
//!   merge each key's list recursively;
//! - sequences copy the last argument element by element;
//! - sets accumulate members from sets, truthy map entries and boolean-ish
//!   record fields;
//! - boxed scalars, dates and patterns are complete once constructed.
//!
//! A truthy do-not-merge marker on the arguments leaves only the last one
//! to populate from.
//!
//! Contributions are snapshotted before recursing so no source is borrowed
//! while a child merge runs.

use indexmap::IndexMap;
use overlay_types::{Composite, FieldKey, Key, Object, Value};
use tracing::trace;

use crate::args::replaces_predecessors;
use crate::classify::{classify_composite, Kind};
use crate::engine::MergeRun;
use crate::error::MergeResult;

pub(crate) fn populate(
    run: &mut MergeRun<'_>,
    shell: &Object,
    args: &[Value],
    depth: usize,
) -> MergeResult<()> {
    // The shell's type and memo entry are already settled on the full list.
    let args = if args.len() > 1 && replaces_predecessors(args) {
        trace!(dropped = args.len() - 1, "do-not-merge marker set");
        &args[args.len() - 1..]
    } else {
        args
    };
    let kind = classify_composite(&shell.borrow());
    match kind {
        Kind::Record => populate_record(run, shell, args, depth),
        Kind::Map => populate_map(run, shell, args, depth),
        Kind::Sequence => populate_sequence(run, shell, args, depth),
        Kind::Set => populate_set(run, shell, args, depth),
        _ => Ok(()),
    }
}

/// Own `(key, value)` pairs an argument contributes to a keyed merge.
///
/// Records yield their fields, maps their entries and sequences their
/// present indices. Other kinds contribute nothing.
fn own_entries(arg: &Value) -> Vec<(Value, Value)> {
    let Some(obj) = arg.as_object() else {
        return Vec::new();
    };
    match &*obj.borrow() {
        Composite::Record(record) => record
            .fields
            .iter()
            .map(|(k, v)| (k.to_value(), v.clone()))
            .collect(),
        Composite::Map(map) => map
            .entries
            .iter()
            .map(|(k, v)| (k.value().clone(), v.clone()))
            .collect(),
        Composite::Sequence(seq) => seq
            .present()
            .map(|(i, v)| (Value::Number(i as f64), v.clone()))
            .collect(),
        _ => Vec::new(),
    }
}

/// Group contributions per key, in first-seen key order across arguments.
fn collect<K, F>(args: &[Value], to_key: F) -> IndexMap<K, Vec<Value>>
where
    K: std::hash::Hash + Eq,
    F: Fn(Value) -> K,
{
    let mut grouped: IndexMap<K, Vec<Value>> = IndexMap::new();
    for arg in args {
        for (k, v) in own_entries(arg) {
            grouped.entry(to_key(k)).or_default().push(v);
        }
    }
    grouped
}

fn populate_record(
    run: &mut MergeRun<'_>,
    shell: &Object,
    args: &[Value],
    depth: usize,
) -> MergeResult<()> {
    for (key, values) in collect(args, |k| FieldKey::from_value(&k)) {
        let merged = run.merge_at(&values, depth + 1)?;
        if let Composite::Record(record) = &mut *shell.borrow_mut() {
            record.fields.insert(key, merged);
        }
    }
    Ok(())
}

fn populate_map(
    run: &mut MergeRun<'_>,
    shell: &Object,
    args: &[Value],
    depth: usize,
) -> MergeResult<()> {
    for (key, values) in collect(args, Key::new) {
        let merged = run.merge_at(&values, depth + 1)?;
        if let Composite::Map(map) = &mut *shell.borrow_mut() {
            map.entries.insert(key, merged);
        }
    }
    Ok(())
}

/// Only the last sequence counts; each element is copied on its own.
fn populate_sequence(
    run: &mut MergeRun<'_>,
    shell: &Object,
    args: &[Value],
    depth: usize,
) -> MergeResult<()> {
    let Some(last) = args.last().and_then(Value::as_object) else {
        return Ok(());
    };
    let items: Vec<(usize, Value)> = match last.borrow().as_sequence() {
        Some(seq) => seq.present().map(|(i, v)| (i, v.clone())).collect(),
        None => return Ok(()),
    };
    for (index, item) in items {
        let copied = run.merge_at(std::slice::from_ref(&item), depth + 1)?;
        if let Composite::Sequence(seq) = &mut *shell.borrow_mut() {
            seq.items[index] = Some(copied);
        }
    }
    Ok(())
}

/// A change to apply to a set under construction.
enum SetDelta {
    /// Add the member, copying it first if configured.
    Add(Value),
    /// Add the member as-is.
    AddName(Value),
    Remove(Value),
}

fn set_deltas(arg: &Value) -> Vec<SetDelta> {
    let Some(obj) = arg.as_object() else {
        return Vec::new();
    };
    match &*obj.borrow() {
        Composite::Set(set) => set
            .members
            .iter()
            .map(|m| SetDelta::Add(m.value().clone()))
            .collect(),
        Composite::Map(map) => map
            .entries
            .iter()
            .map(|(k, v)| {
                if v.is_truthy() {
                    SetDelta::Add(k.value().clone())
                } else {
                    SetDelta::Remove(k.value().clone())
                }
            })
            .collect(),
        Composite::Record(record) => record
            .fields
            .iter()
            .filter_map(|(k, v)| {
                let name = Value::from(k.as_name()?);
                match v {
                    Value::Undefined => None,
                    v if v.is_truthy() => Some(SetDelta::AddName(name)),
                    _ => Some(SetDelta::Remove(name)),
                }
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn populate_set(
    run: &mut MergeRun<'_>,
    shell: &Object,
    args: &[Value],
    depth: usize,
) -> MergeResult<()> {
    let copy_members = run.config().copy_set_members;
    for arg in args {
        for delta in set_deltas(arg) {
            let (member, add) = match delta {
                SetDelta::Add(member) if copy_members => {
                    (run.merge_at(std::slice::from_ref(&member), depth + 1)?, true)
                }
                SetDelta::Add(member) | SetDelta::AddName(member) => (member, true),
                SetDelta::Remove(member) => (member, false),
            };
            if let Composite::Set(set) = &mut *shell.borrow_mut() {
                let key = Key::new(member);
                if add {
                    set.members.insert(key);
                } else {
                    trace!(member = %key.value(), "removing set member");
                    set.members.shift_remove(&key);
                }
            }
        }
    }
    Ok(())
}
