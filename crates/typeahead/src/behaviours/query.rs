use crate::typeahead::Typeahead;
use dom::Document;

/// The trimmed value of the host input.
pub fn value(typeahead: &Typeahead, doc: &Document) -> String {
    doc.value(typeahead.input()).trim().to_string()
}
