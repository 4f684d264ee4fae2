//! GitHub-style heading slugs.

use std::collections::HashMap;

/// Slug for a single heading text, without duplicate handling.
///
/// Letters and digits are lowercased and kept, `-` and `_` are kept, each
/// whitespace run becomes one `-`, everything else is dropped. Leading and
/// trailing `-` are trimmed and no two `-` end up adjacent.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if c == '_' {
            slug.push(c);
        } else if (c == '-' || c.is_whitespace()) && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// Per-document slug generator adding `-1`, `-2`, ... to repeated slugs.
///
/// Counters are keyed by base slug, so a suffixed slug may equal the base
/// slug of another heading; such anchors share an id.
#[derive(Debug, Default)]
pub struct Slugger {
    counts: HashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slug for `text`, suffixed by how often its base slug was seen before.
    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let count = self.counts.entry(base.clone()).or_insert(0);
        let slug = match *count {
            0 => base,
            n => format!("{base}-{n}"),
        };
        *count += 1;
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Hello World", "hello-world")]
    #[case("C++ Guide", "c-guide")]
    #[case("  Spaces   everywhere  ", "spaces-everywhere")]
    #[case("snake_case and kebab-case", "snake_case-and-kebab-case")]
    #[case("a - b", "a-b")]
    #[case("a--b", "a-b")]
    #[case("What's New?", "whats-new")]
    #[case("Überblick 2024", "überblick-2024")]
    #[case("!!!", "")]
    fn slugify_cases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(slugify(input), expected);
    }

    #[test]
    fn duplicates_get_suffixes() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slug("Hello World"), "hello-world");
        assert_eq!(slugger.slug("Hello World"), "hello-world-1");
        assert_eq!(slugger.slug("Hello World"), "hello-world-2");
        assert_eq!(slugger.slug("Other"), "other");
    }

    #[test]
    fn suffixes_count_per_base_slug() {
        let mut slugger = Slugger::new();
        let slugs: Vec<_> = ["a", "a", "a 1", "a"]
            .into_iter()
            .map(|text| slugger.slug(text))
            .collect();
        assert_eq!(slugs, vec!["a", "a-1", "a-1", "a-2"]);
    }

    #[test]
    fn counters_are_per_generator() {
        let mut first = Slugger::new();
        let mut second = Slugger::new();
        assert_eq!(first.slug("x"), "x");
        assert_eq!(second.slug("x"), "x");
    }
}
