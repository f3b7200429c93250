//! Error types for the merge engine.

/// Errors that abort a merge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    /// The top-level input was not a list of values. Raised before any
    /// traversal begins.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A composite could not be classified into any supported kind.
    #[error("don't know how to merge {kind} objects")]
    UnsupportedKind {
        /// The tag of the offending object.
        kind: String,
    },

    /// The input nests deeper than the configured limit.
    #[error("merge depth limit of {limit} exceeded")]
    DepthExceeded {
        /// The configured maximum depth.
        limit: usize,
    },
}

impl MergeError {
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedKind { kind: kind.into() }
    }
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
