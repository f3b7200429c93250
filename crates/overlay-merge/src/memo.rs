use std::collections::HashMap;
use std::fmt;

use overlay_types::Object;

/// Identity table from source composites to the results built for them.
///
/// Entries are only recorded for merge positions that had exactly one
/// surviving argument, i.e. plain copies. A memo is normally scoped to one
/// top-level call; callers may thread one through several calls to keep
/// shared sub-structures shared across the outputs.
///
/// The memo holds on to each source handle so that its address cannot be
/// reused by another allocation while the entry exists.
#[derive(Default)]
pub struct Memo {
    entries: HashMap<usize, MemoEntry>,
}

struct MemoEntry {
    _source: Object,
    result: Object,
}

impl Memo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of memoized sources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The result already built for `source`, if any.
    pub fn get(&self, source: &Object) -> Option<Object> {
        self.entries
            .get(&source.addr())
            .map(|entry| entry.result.clone())
    }

    pub fn contains(&self, source: &Object) -> bool {
        self.entries.contains_key(&source.addr())
    }

    /// Record the result for `source`, replacing any previous entry.
    pub fn insert(&mut self, source: &Object, result: Object) {
        self.entries.insert(
            source.addr(),
            MemoEntry {
                _source: source.clone(),
                result,
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Debug for Memo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo")
            .field("entry_count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_types::{Composite, Record};

    fn record() -> Object {
        Object::new(Composite::Record(Record::plain()))
    }

    #[test]
    fn lookup_is_by_identity() {
        let source = record();
        let twin = record();
        let result = record();

        let mut memo = Memo::new();
        assert!(memo.is_empty());
        memo.insert(&source, result.clone());

        assert_eq!(memo.len(), 1);
        assert!(memo.contains(&source));
        assert!(memo.contains(&source.clone()));
        assert!(!memo.contains(&twin));
        assert!(memo.get(&source).is_some_and(|r| r.ptr_eq(&result)));
    }

    #[test]
    fn clear_empties() {
        let mut memo = Memo::new();
        memo.insert(&record(), record());
        memo.clear();
        assert!(memo.is_empty());
        assert_eq!(format!("{memo:?}"), "Memo { entry_count: 0 }");
    }
}
