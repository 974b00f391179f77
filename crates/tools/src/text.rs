/// Case-insensitive text helpers for suggestion matching.
///
/// Folding uses `char::to_lowercase`, which is locale independent. All
/// prefix arithmetic counts chars, never bytes.

/// The first `n` chars of `s` (all of `s` when shorter).
pub fn char_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((at, _)) => &s[..at],
        None => s,
    }
}

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

pub fn fold_case(s: &str) -> String {
    s.to_lowercase()
}

pub fn starts_with_ignore_case(haystack: &str, needle: &str) -> bool {
    fold_case(haystack).starts_with(&fold_case(needle))
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    fold_case(haystack).contains(&fold_case(needle))
}

/// Cache bucket for a query: its first `min_chars` chars, lower-cased.
pub fn prefix_key(query: &str, min_chars: usize) -> String {
    fold_case(char_prefix(query, min_chars))
}
