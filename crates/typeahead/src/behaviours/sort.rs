use crate::suggestion::Suggestion;
use crate::typeahead::Typeahead;
use std::cmp::Ordering;
use tools::text::{char_len, starts_with_ignore_case};

/// Values starting with the query first, then shorter values, then
/// case-sensitive lexicographic order.
pub fn length(_: &Typeahead, query: &str, a: &Suggestion, b: &Suggestion) -> Ordering {
    let a_starts = starts_with_ignore_case(&a.value, query);
    let b_starts = starts_with_ignore_case(&b.value, query);
    b_starts
        .cmp(&a_starts)
        .then_with(|| char_len(&a.value).cmp(&char_len(&b.value)))
        .then_with(|| a.value.cmp(&b.value))
}
