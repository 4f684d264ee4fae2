//! Reference label normalization.

/// Lowercase, collapse whitespace runs to one space and trim, so that
/// `[Foo  Bar]` and `[foo bar]` name the same definition.
pub fn normalize_label(label: &str) -> String {
    let mut normalized = String::with_capacity(label.len());
    for word in label.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.extend(word.chars().flat_map(char::to_lowercase));
    }
    normalized
}
