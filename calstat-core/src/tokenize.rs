//! Canonical grouping keys for free-text event titles.

use std::collections::BTreeSet;

/// Normalize a title into an order-, case- and punctuation-independent key.
///
/// The title is lowercased first, then every non-alphanumeric character
/// becomes a separator; the words are deduplicated, sorted and joined with
/// single spaces. Lowercasing can produce combining marks (`İ` becomes
/// `i\u{307}`), which are split off here so a key tokenizes to itself.
/// `"Chess Club"` and `"club, chess!!"` both become `"chess club"`.
pub fn tokenize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    let words: BTreeSet<String> = cleaned
        .split_whitespace()
        .map(str::to_string)
        .collect();

    words.into_iter().collect::<Vec<_>>().join(" ")
}
