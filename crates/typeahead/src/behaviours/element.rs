use crate::css;
use crate::suggestion::Suggestion;
use crate::typeahead::Typeahead;
use dom::{Document, DomError, Id};
use regex::RegexBuilder;

/// A `div.mh-typeahead__suggestion` holding the label, with every
/// case-insensitive occurrence of the query wrapped in `<mark>`.
pub fn default(
    _: &Typeahead,
    doc: &mut Document,
    suggestion: &Suggestion,
    query: &str,
) -> Result<Id, DomError> {
    let element = doc.create("div", &[("class", css::SUGGESTION)]);
    append_marked(doc, element, &suggestion.label, query)?;
    Ok(element)
}

/// Appends `text` to `parent` as text nodes, wrapping matches of `query` in
/// `<mark>` elements.
pub fn append_marked(
    doc: &mut Document,
    parent: Id,
    text: &str,
    query: &str,
) -> Result<(), DomError> {
    let pattern = RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build();
    let pattern = match pattern {
        Ok(pattern) if !query.is_empty() => pattern,
        _ => {
            let node = doc.create_text(text);
            return doc.append_child(parent, node);
        }
    };

    let mut last = 0;
    for found in pattern.find_iter(text) {
        if found.start() > last {
            let node = doc.create_text(&text[last..found.start()]);
            doc.append_child(parent, node)?;
        }
        let mark = doc.create_element("mark");
        let node = doc.create_text(found.as_str());
        doc.append_child(mark, node)?;
        doc.append_child(parent, mark)?;
        last = found.end();
    }
    if last < text.len() {
        let node = doc.create_text(&text[last..]);
        doc.append_child(parent, node)?;
    }
    Ok(())
}
