//! Layered JSON configuration built on the Overlay merge engine.
//!
//! Config files are plain JSON. Object keys that start with a comment
//! prefix (`$comment`, `//`, `$#`, `#`, `/*`, after optional whitespace) are
//! dropped during parsing, so files can carry annotations. Several files can
//! be stacked with [`ConfigLoader::load_layers`]; later layers override
//! earlier ones key by key.
//!
//! ```rust
//! use overlay_config::{parse_config, to_json};
//!
//! let value = parse_config(r#"{"// why": "docs", "retries": 3}"#).unwrap();
//! assert_eq!(to_json(&value).unwrap().to_string(), r#"{"retries":3}"#);
//! ```

pub mod comment;
pub mod error;
pub mod json;
pub mod loader;

pub use comment::{is_comment, COMMENT_PREFIXES};
pub use error::{ConfigError, ConfigResult};
pub use json::{from_json, parse_config, to_json};
pub use loader::ConfigLoader;
