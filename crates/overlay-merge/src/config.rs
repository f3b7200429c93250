use overlay_types::{Prototype, TypeDescriptor};

/// Default nesting limit; see [`MergeConfig::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Configuration for a merge.
#[derive(Clone, Debug)]
pub struct MergeConfig {
    /// Types that never decide the result type while a stronger-typed
    /// argument is present. Ordered, without duplicates.
    pub weak_types: Vec<TypeDescriptor>,
    /// Force the result records to be instances of this type.
    pub type_override: Option<TypeDescriptor>,
    /// Force the prototype of result records verbatim, `Prototype::Null`
    /// included. Takes precedence over `type_override`.
    pub result_prototype: Option<Prototype>,
    /// Deep-copy members when populating sets instead of sharing them.
    pub copy_set_members: bool,
    /// Maximum nesting depth of composites before the merge is aborted.
    pub max_depth: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            weak_types: vec![TypeDescriptor::OBJECT],
            type_override: None,
            result_prototype: None,
            copy_set_members: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl MergeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a weak type. Adding a type twice has no effect.
    pub fn with_weak_type(mut self, desc: TypeDescriptor) -> Self {
        if !self.weak_types.contains(&desc) {
            self.weak_types.push(desc);
        }
        self
    }

    /// Replace the whole weak type list.
    pub fn with_weak_types(mut self, types: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        self.weak_types.clear();
        for desc in types {
            self = self.with_weak_type(desc);
        }
        self
    }

    pub fn with_type_override(mut self, desc: TypeDescriptor) -> Self {
        self.type_override = Some(desc);
        self
    }

    pub fn with_result_prototype(mut self, prototype: Prototype) -> Self {
        self.result_prototype = Some(prototype);
        self
    }

    pub fn with_copy_set_members(mut self, copy: bool) -> Self {
        self.copy_set_members = copy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Whether a prototype is in the weak list. `Prototype::Null` never is.
    pub fn is_weak(&self, prototype: &Prototype) -> bool {
        prototype
            .descriptor()
            .is_some_and(|desc| self.weak_types.contains(desc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = MergeConfig::default();
        assert_eq!(config.weak_types, vec![TypeDescriptor::OBJECT]);
        assert!(config.type_override.is_none());
        assert!(config.result_prototype.is_none());
        assert!(!config.copy_set_members);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn weak_types_stay_unique() {
        let custom = TypeDescriptor::new("Custom");
        let config = MergeConfig::new()
            .with_weak_type(custom.clone())
            .with_weak_type(custom.clone())
            .with_weak_type(TypeDescriptor::OBJECT);
        assert_eq!(config.weak_types, vec![TypeDescriptor::OBJECT, custom]);
    }

    #[test]
    fn null_prototype_is_never_weak() {
        let config = MergeConfig::default();
        assert!(config.is_weak(&Prototype::plain()));
        assert!(!config.is_weak(&Prototype::Null));
        assert!(!config.is_weak(&Prototype::Of(TypeDescriptor::ARRAY)));
    }

    #[test]
    fn replacing_weak_types() {
        let config = MergeConfig::new().with_weak_types([TypeDescriptor::MAP]);
        assert!(!config.is_weak(&Prototype::plain()));
        assert!(config.is_weak(&Prototype::Of(TypeDescriptor::MAP)));
    }
}
