//! The merge driver.
//!
//! [`DeepMerger`] owns a [`MergeConfig`]; each top-level call creates a
//! `MergeRun` that threads the config, the memo and the current depth
//! through the recursion.

use overlay_types::{Composite, Value};
use tracing::{debug, trace};

use crate::args::{filter_args, Survivors};
use crate::classify::classify;
use crate::config::MergeConfig;
use crate::error::{MergeError, MergeResult};
use crate::memo::Memo;
use crate::proto::resolve_prototype;
use crate::shell::construct;
use crate::state::populate;

/// Deep merge and copy of [`Value`]s under a fixed configuration.
///
/// ```rust
/// use overlay_merge::DeepMerger;
/// use overlay_types::Value;
///
/// let merger = DeepMerger::default();
/// let base = Value::record([("a", 1), ("b", 2)]);
/// let patch = Value::record([("b", 3), ("c", 4)]);
/// let merged = merger.merge(&[base, patch]).unwrap();
/// assert!(merged.structurally_equal(&Value::record([("a", 1), ("b", 3), ("c", 4)])));
/// ```
#[derive(Clone, Debug, Default)]
pub struct DeepMerger {
    config: MergeConfig,
}

impl DeepMerger {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Merge `values`, later values taking precedence at every level.
    pub fn merge(&self, values: &[Value]) -> MergeResult<Value> {
        let mut memo = Memo::new();
        self.merge_with_memo(values, &mut memo)
    }

    /// Merge using a caller-supplied memo, so identity is preserved across
    /// several calls sharing it.
    pub fn merge_with_memo(&self, values: &[Value], memo: &mut Memo) -> MergeResult<Value> {
        debug!(args = values.len(), memo = memo.len(), "deep merge");
        MergeRun::new(&self.config, memo).merge_at(values, 0)
    }

    /// Merge the elements of a sequence value.
    ///
    /// Returns [`MergeError::InvalidArgument`] when `values` is not a
    /// sequence. Holes are treated as `Undefined`.
    pub fn merge_value(&self, values: &Value) -> MergeResult<Value> {
        let list = match values.as_object() {
            Some(obj) => match &*obj.borrow() {
                Composite::Sequence(seq) => seq
                    .items
                    .iter()
                    .map(|slot| slot.clone().unwrap_or_default())
                    .collect::<Vec<_>>(),
                _ => return Err(not_a_list(values)),
            },
            None => return Err(not_a_list(values)),
        };
        self.merge(&list)
    }

    /// Deep copy of a single value.
    pub fn copy(&self, value: &Value) -> MergeResult<Value> {
        self.merge(std::slice::from_ref(value))
    }

    pub fn copy_with_memo(&self, value: &Value, memo: &mut Memo) -> MergeResult<Value> {
        self.merge_with_memo(std::slice::from_ref(value), memo)
    }
}

fn not_a_list(value: &Value) -> MergeError {
    MergeError::InvalidArgument(format!(
        "merge expects a sequence of values, got {}; put the arguments into a sequence",
        classify(value)
    ))
}

/// State of one top-level merge call.
pub(crate) struct MergeRun<'a> {
    config: &'a MergeConfig,
    memo: &'a mut Memo,
}

impl<'a> MergeRun<'a> {
    fn new(config: &'a MergeConfig, memo: &'a mut Memo) -> Self {
        Self { config, memo }
    }

    pub(crate) fn config(&self) -> &MergeConfig {
        self.config
    }

    /// Merge one position. `depth` counts the composites above it.
    pub(crate) fn merge_at(&mut self, values: &[Value], depth: usize) -> MergeResult<Value> {
        let args = match filter_args(values) {
            Survivors::Decided(value) => return Ok(value),
            Survivors::Merge(args) => args,
        };

        let Some(last) = args.last().and_then(Value::as_object).cloned() else {
            // filter_args guarantees an object at the end
            return Ok(args.last().cloned().unwrap_or_default());
        };

        let single = args.len() == 1;
        if single {
            if let Some(hit) = self.memo.get(&last) {
                trace!(source = last.addr(), "memo hit");
                return Ok(Value::Object(hit));
            }
        }

        if depth >= self.config.max_depth {
            return Err(MergeError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }

        let prototype = resolve_prototype(&args, self.config);
        let shell = construct(&last, prototype)?;
        if single {
            // Before populating, so self-references resolve to the shell.
            self.memo.insert(&last, shell.clone());
        }
        if !shell.ptr_eq(&last) {
            populate(self, &shell, &args, depth)?;
        }
        Ok(Value::Object(shell))
    }
}

/// Merge `values` with the default configuration.
pub fn merge(values: &[Value]) -> MergeResult<Value> {
    DeepMerger::default().merge(values)
}

/// Deep copy `value` with the default configuration.
pub fn copy(value: &Value) -> MergeResult<Value> {
    DeepMerger::default().copy(value)
}
