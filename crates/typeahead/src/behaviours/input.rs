use crate::suggestion::Suggestion;
use crate::typeahead::Typeahead;
use dom::{Document, DomError, Id};
use serde_json::Value;

/// Data slot on the host input read by a cooperating tokenizer.
pub const TOKEN_SLOT: &str = "token";

/// Writes the suggestion's value into the host input.
pub fn set_value(
    typeahead: &Typeahead,
    doc: &mut Document,
    suggestion: Option<&Suggestion>,
) -> Result<(), DomError> {
    let input = typeahead.input();
    doc.set_value(input, suggestion.map_or("", |s| s.value.as_str()))?;
    doc.dispatch_on(input, "change", Value::Null);
    Ok(())
}

/// Writes the label into the host input and the value into the field matched
/// by `hiddenSelector`.
pub fn set_hidden(
    typeahead: &Typeahead,
    doc: &mut Document,
    suggestion: Option<&Suggestion>,
) -> Result<(), DomError> {
    let input = typeahead.input();
    let hidden = hidden_field(typeahead, doc)?;
    let (label, value) = suggestion.map_or(("", ""), |s| (s.label.as_str(), s.value.as_str()));
    doc.set_value(input, label)?;
    match hidden {
        Some(hidden) => doc.set_value(hidden, value)?,
        None => log::warn!(
            target: "typeahead",
            "no hidden field matches {:?}",
            typeahead.options().hidden_selector
        ),
    }
    doc.dispatch_on(input, "change", Value::Null);
    Ok(())
}

/// Hands the suggestion to a tokenizer through the input's token slot.
pub fn tokenizer(
    typeahead: &Typeahead,
    doc: &mut Document,
    suggestion: Option<&Suggestion>,
) -> Result<(), DomError> {
    let input = typeahead.input();
    match suggestion {
        Some(s) => doc.set_data(input, TOKEN_SLOT, s.to_json())?,
        None => {
            doc.take_data(input, TOKEN_SLOT);
        }
    }
    doc.dispatch_on(input, "change", Value::Null);
    Ok(())
}

fn hidden_field(typeahead: &Typeahead, doc: &Document) -> Result<Option<Id>, DomError> {
    let selector = typeahead.options().hidden_selector.trim();
    if selector.is_empty() {
        return Ok(None);
    }
    doc.one(selector, None)
}
