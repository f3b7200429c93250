use std::path::PathBuf;

use overlay_merge::MergeError;

/// Errors from loading, parsing, and rendering configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A config file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is not valid JSON.
    #[error("invalid JSON in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// Merging the layers failed.
    #[error("merge failed: {0}")]
    Merge(#[from] MergeError),

    /// The value contains something JSON cannot express.
    #[error("cannot represent {kind} as JSON")]
    Unrepresentable { kind: String },

    /// The value nests deeper than the renderer allows (or is cyclic).
    #[error("value nests deeper than {limit} levels")]
    TooDeep { limit: usize },
}

impl ConfigError {
    pub(crate) fn unrepresentable(kind: impl Into<String>) -> Self {
        Self::Unrepresentable { kind: kind.into() }
    }
}

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
