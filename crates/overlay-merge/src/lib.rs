//! Deep merge and clone engine for Overlay values.
//!
//! Given an ordered list of values, the engine builds a new, independent
//! value that merges all of them, later arguments taking precedence at every
//! nesting level. Merging a single value is a deep copy.
//!
//! A merge position is resolved in five steps:
//!
//! 1. **Filter**: absent values are dropped; a trailing primitive decides
//!    the result outright, and nothing before the last primitive survives.
//! 2. **Classify**: the last argument's kind picks the result kind.
//! 3. **Resolve type**: overrides first, then the most recent argument whose
//!    type is not weak (see [`MergeConfig::weak_types`]).
//! 4. **Construct**: an empty shell of that kind and type is allocated.
//! 5. **Populate**: keyed merge for records and maps, last-wins copy for
//!    sequences, member accumulation for sets.
//!
//! Single-argument positions are memoized by source identity, so shared and
//! self-referential structures are copied once and keep their shape.
//!
//! # Quick Start
//!
//! ```rust
//! use overlay_merge::{copy, merge};
//! use overlay_types::Value;
//!
//! let defaults = Value::record([("port", 8080), ("debug", 0)]);
//! let local = Value::record([("debug", 1)]);
//! let config = merge(&[defaults, local]).unwrap();
//! assert!(config.structurally_equal(&Value::record([("port", 8080), ("debug", 1)])));
//!
//! let snapshot = copy(&config).unwrap();
//! assert!(!snapshot.same(&config));
//! ```

mod args;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod memo;
mod proto;
mod shell;
mod state;

pub use classify::{classify, Kind};
pub use config::{MergeConfig, DEFAULT_MAX_DEPTH};
pub use engine::{copy, merge, DeepMerger};
pub use error::{MergeError, MergeResult};
pub use memo::Memo;
