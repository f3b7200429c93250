//! Result type resolution.
//!
//! Precedence: an explicit result prototype, then a type override, then the
//! most recent argument whose type is not weak. When every argument is weak
//! the last argument's type is used.

use overlay_types::{Prototype, Value};

use crate::config::MergeConfig;

pub(crate) fn resolve_prototype(args: &[Value], config: &MergeConfig) -> Prototype {
    if let Some(prototype) = &config.result_prototype {
        return prototype.clone();
    }
    if let Some(desc) = &config.type_override {
        return Prototype::Of(desc.clone());
    }

    // Primitives heading the list carry no nominal type of their own.
    let prototypes: Vec<Prototype> = args
        .iter()
        .filter_map(Value::as_object)
        .map(|obj| obj.prototype())
        .collect();

    prototypes
        .iter()
        .rev()
        .find(|p| !config.is_weak(p))
        .or(prototypes.last())
        .cloned()
        .unwrap_or_default()
}
