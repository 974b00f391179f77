use crate::suggestion::Suggestion;
use crate::typeahead::Typeahead;
use tools::text::{contains_ignore_case, starts_with_ignore_case};

pub fn contains(_: &Typeahead, suggestion: &Suggestion, query: &str) -> bool {
    contains_ignore_case(&suggestion.label, query)
}

pub fn starts_with(_: &Typeahead, suggestion: &Suggestion, query: &str) -> bool {
    starts_with_ignore_case(&suggestion.label, query)
}
