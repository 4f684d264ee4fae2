//! Fragment syntax that is valid regardless of the document's anchors.

use std::sync::LazyLock;

use regex::Regex;

/// GitHub line references: `L10`, `L10-L20`, `L3C5-L4C1`.
static LINE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[Ll][0-9Cc-]*[0-9][0-9Cc-]*$").unwrap());

/// `fragment` without its leading `#`, if any.
pub fn fragment_name(fragment: &str) -> &str {
    fragment.strip_prefix('#').unwrap_or(fragment)
}

pub fn is_line_reference(name: &str) -> bool {
    LINE_REFERENCE.is_match(name)
}

/// Empty fragments, `#top` and line references need no matching anchor.
pub fn is_always_valid(fragment: &str) -> bool {
    let name = fragment_name(fragment);
    name.is_empty() || name.eq_ignore_ascii_case("top") || is_line_reference(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("#")]
    #[case("#top")]
    #[case("#TOP")]
    #[case("#L20")]
    #[case("#l20")]
    #[case("#L10-L20")]
    #[case("#L3C5-L4C1")]
    fn always_valid(#[case] fragment: &str) {
        assert!(is_always_valid(fragment));
    }

    #[rstest]
    #[case("#nonexistent")]
    #[case("#L")]
    #[case("#Lx1")]
    #[case("#topic")]
    #[case("#L-C")]
    fn needs_an_anchor(#[case] fragment: &str) {
        assert!(!is_always_valid(fragment));
    }

    #[test]
    fn name_strips_one_hash() {
        assert_eq!(fragment_name("#a"), "a");
        assert_eq!(fragment_name("a"), "a");
        assert_eq!(fragment_name("##a"), "#a");
    }
}
