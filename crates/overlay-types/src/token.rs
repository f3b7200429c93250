use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

/// Id 0 belongs to [`Token::DONT_MERGE`].
static NEXT_TOKEN_ID: AtomicU64 = AtomicU64::new(1);

/// An opaque, identity-only marker value.
///
/// Tokens compare equal only to themselves (and their clones). The
/// description is carried for display and never participates in equality.
#[derive(Clone)]
pub struct Token {
    id: u64,
    description: Option<Cow<'static, str>>,
}

impl Token {
    /// The well-known do-not-merge marker.
    ///
    /// A record carrying a truthy field keyed by this token replaces the
    /// values before it instead of being merged with them.
    pub const DONT_MERGE: Token = Token {
        id: 0,
        description: Some(Cow::Borrowed("dontMerge")),
    };

    /// Create a fresh token with a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: NEXT_TOKEN_ID.fetch_add(1, Ordering::Relaxed),
            description: Some(Cow::Owned(description.into())),
        }
    }

    /// Create a fresh token without a description.
    pub fn anonymous() -> Self {
        Self {
            id: NEXT_TOKEN_ID.fetch_add(1, Ordering::Relaxed),
            description: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique() {
        let a = Token::new("u");
        let b = Token::new("u");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn dont_merge_is_a_single_constant() {
        let marker = Token::DONT_MERGE;
        assert_eq!(marker, Token::DONT_MERGE);
        assert_eq!(marker.description(), Some("dontMerge"));
        assert_ne!(Token::new("dontMerge"), Token::DONT_MERGE);
    }

    #[test]
    fn display_shows_description() {
        assert_eq!(Token::new("e").to_string(), "Symbol(e)");
        assert_eq!(Token::anonymous().to_string(), "Symbol()");
    }
}
