/// Key prefixes that mark a JSON object entry as a comment.
pub const COMMENT_PREFIXES: [&str; 5] = ["$comment", "//", "$#", "#", "/*"];

/// Whether `key` names a comment entry.
///
/// Leading whitespace is ignored; anything else before the prefix is not.
pub fn is_comment(key: &str) -> bool {
    let key = key.trim_start();
    COMMENT_PREFIXES.iter().any(|prefix| key.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn every_prefix_is_recognised() {
        for prefix in COMMENT_PREFIXES {
            assert!(is_comment(prefix), "{prefix}");
            assert!(is_comment(&format!("{prefix} xy")));
            assert!(is_comment(&format!("{prefix}abcd")));
        }
    }

    #[test]
    fn leading_whitespace_is_allowed() {
        for prefix in COMMENT_PREFIXES {
            assert!(is_comment(&format!(" {prefix}")));
            assert!(is_comment(&format!("   \t {prefix}")));
        }
    }

    #[test]
    fn leading_text_is_not() {
        for prefix in COMMENT_PREFIXES {
            assert!(!is_comment(&format!("ab{prefix}")));
            assert!(!is_comment(&format!("xy {prefix}")));
            assert!(!is_comment(&format!("  qr{prefix}")));
        }
    }

    #[test]
    fn ordinary_keys() {
        for key in ["a", "%extends", "  something", "  \t \n  ", "", "$schema", "/path"] {
            assert!(!is_comment(key), "{key:?}");
        }
    }

    proptest! {
        #[test]
        fn whitespace_then_prefix_is_a_comment(
            pad in "[ \t\n]{0,4}",
            index in 0..COMMENT_PREFIXES.len(),
            rest in "\\PC{0,12}",
        ) {
            let key = format!("{pad}{}{rest}", COMMENT_PREFIXES[index]);
            prop_assert!(is_comment(&key));
        }

        #[test]
        fn alphanumeric_start_is_never_a_comment(key in "[a-zA-Z0-9_][ -~]{0,12}") {
            prop_assert!(!is_comment(&key));
        }
    }
}
