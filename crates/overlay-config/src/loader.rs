use std::fs;
use std::path::Path;

use overlay_merge::{DeepMerger, MergeConfig};
use overlay_types::Value;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::json::parse_named;

/// Loads JSON config files and deep-merges them as layers.
///
/// Later layers win at every nesting level; sequences in a later layer
/// replace earlier ones wholesale.
#[derive(Clone, Debug, Default)]
pub struct ConfigLoader {
    merger: DeepMerger,
}

impl ConfigLoader {
    pub fn new(config: MergeConfig) -> Self {
        Self {
            merger: DeepMerger::new(config),
        }
    }

    pub fn merger(&self) -> &DeepMerger {
        &self.merger
    }

    /// Read and parse one file.
    pub fn load_file(&self, path: impl AsRef<Path>) -> ConfigResult<Value> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = text.len(), "loaded config layer");
        parse_named(&text, &path.display().to_string())
    }

    /// Load every file in order and merge them into one value.
    ///
    /// An empty list yields `Undefined`.
    pub fn load_layers<P: AsRef<Path>>(&self, paths: &[P]) -> ConfigResult<Value> {
        let layers = paths
            .iter()
            .map(|path| self.load_file(path))
            .collect::<ConfigResult<Vec<_>>>()?;
        debug!(layers = layers.len(), "merging config layers");
        Ok(self.merger.merge(&layers)?)
    }
}
