//! Built-in strategies for each tokenizer role, looked up by name when an
//! instance is configured.

use crate::css;
use crate::error::TokenizerError;
use crate::options::TokenizerBehaviourNames;
use crate::tokenizer::{Token, Tokenizer};
use dom::{Document, DomError, Id};
use typeahead::{BehaviourError, RawItem};

pub type CoerceFn = fn(&Tokenizer, RawItem) -> Result<Token, BehaviourError>;
pub type ElementFn = fn(&Tokenizer, &mut Document, &Token) -> Result<Id, DomError>;
pub type StoreFn = fn(&mut Tokenizer, &mut Document) -> Result<(), TokenizerError>;
pub type ContainerFn = fn(&Tokenizer, &mut Document) -> Result<Id, DomError>;

/// The strategy chosen for every role of one instance.
#[derive(Clone, Copy)]
pub struct TokenizerBehaviours {
    pub coerce: CoerceFn,
    pub element: ElementFn,
    pub store: StoreFn,
    pub tokenizer: ContainerFn,
}

impl TokenizerBehaviours {
    pub fn resolve(names: &TokenizerBehaviourNames) -> Result<Self, TokenizerError> {
        Ok(Self {
            coerce: lookup("coerce", &names.coerce, coerce)?,
            element: lookup("element", &names.element, element)?,
            store: lookup("store", &names.store, store)?,
            tokenizer: lookup("tokenizer", &names.tokenizer, container)?,
        })
    }
}

fn lookup<F>(
    role: &'static str,
    name: &str,
    table: fn(&str) -> Option<F>,
) -> Result<F, TokenizerError> {
    table(name).ok_or_else(|| TokenizerError::UnknownBehaviour {
        role,
        name: name.to_string(),
    })
}

pub fn coerce(name: &str) -> Option<CoerceFn> {
    match name {
        "passThrough" => Some(pass_through),
        "valueOnly" => Some(value_only),
        _ => None,
    }
}

pub fn element(name: &str) -> Option<ElementFn> {
    match name {
        "default" => Some(default_chip),
        _ => None,
    }
}

pub fn store(name: &str) -> Option<StoreFn> {
    match name {
        "inputs" => Some(store_inputs),
        "json" => Some(store_json),
        "none" => Some(store_none),
        "string" => Some(store_string),
        _ => None,
    }
}

pub fn container(name: &str) -> Option<ContainerFn> {
    match name {
        "default" => Some(default_container),
        _ => None,
    }
}

pub fn pass_through(_: &Tokenizer, item: RawItem) -> Result<Token, BehaviourError> {
    item.into_shaped()
}

pub fn value_only(_: &Tokenizer, item: RawItem) -> Result<Token, BehaviourError> {
    item.into_value_only()
}

pub fn default_container(_: &Tokenizer, doc: &mut Document) -> Result<Id, DomError> {
    Ok(doc.create("div", &[("class", css::TOKENIZER)]))
}

/// `div.mh-token` holding the label and a remove control.
pub fn default_chip(_: &Tokenizer, doc: &mut Document, token: &Token) -> Result<Id, DomError> {
    let label = doc.create("div", &[("class", css::LABEL)]);
    doc.set_text_content(label, &token.label)?;
    let remove = doc.create("div", &[("class", css::REMOVE)]);
    let chip = doc.create("div", &[("class", css::TOKEN)]);
    doc.append_child(chip, label)?;
    doc.append_child(chip, remove)?;
    Ok(chip)
}

/// One hidden `<input>` per token, named by `hiddenSelector` and placed
/// right after the host input. Fields from the previous sync are removed.
pub fn store_inputs(tokenizer: &mut Tokenizer, doc: &mut Document) -> Result<(), TokenizerError> {
    for stale in tokenizer.take_hidden_inputs() {
        doc.remove_subtree(stale)?;
    }
    let input = tokenizer.input();
    let Some(parent) = doc.parent(input) else {
        log::warn!(target: "tokenizer", "host input is detached; nothing stored");
        return Ok(());
    };
    let anchor = {
        let siblings = doc.children(parent);
        siblings
            .iter()
            .position(|c| *c == input)
            .and_then(|i| siblings.get(i + 1).copied())
    };
    let name = tokenizer.options().hidden_selector.clone();
    let mut created = Vec::with_capacity(tokenizer.tokens().len());
    for token in tokenizer.tokens() {
        let field = doc.create(
            "input",
            &[
                ("type", "hidden"),
                ("name", name.as_str()),
                ("value", token.value.as_str()),
            ],
        );
        doc.insert_before(parent, field, anchor)?;
        created.push(field);
    }
    tokenizer.set_hidden_inputs(created);
    Ok(())
}

/// Keeps the tokens in the UI only.
pub fn store_none(_: &mut Tokenizer, _: &mut Document) -> Result<(), TokenizerError> {
    Ok(())
}

/// The token values as a JSON list in the hidden field.
pub fn store_json(tokenizer: &mut Tokenizer, doc: &mut Document) -> Result<(), TokenizerError> {
    let values: Vec<&str> = tokenizer.tokens().iter().map(|t| t.value.as_str()).collect();
    let serialized = serde_json::to_string(&values)?;
    write_hidden(tokenizer, doc, &serialized)
}

/// The token values joined with commas in the hidden field.
pub fn store_string(tokenizer: &mut Tokenizer, doc: &mut Document) -> Result<(), TokenizerError> {
    let joined = tokenizer
        .tokens()
        .iter()
        .map(|t| t.value.as_str())
        .collect::<Vec<_>>()
        .join(",");
    write_hidden(tokenizer, doc, &joined)
}

fn write_hidden(tokenizer: &Tokenizer, doc: &mut Document, value: &str) -> Result<(), TokenizerError> {
    let selector = tokenizer.options().hidden_selector.trim();
    let field = if selector.is_empty() {
        None
    } else {
        doc.one(selector, None)?
    };
    match field {
        Some(field) => doc.set_value(field, value)?,
        None => log::warn!(target: "tokenizer", "no hidden field matches {selector:?}"),
    }
    Ok(())
}
