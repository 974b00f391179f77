#![allow(dead_code)]

use dom::{Document, Id};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::rc::Rc;
use tokenizer::{Token, Tokenizer};

pub const HIDDEN: &str = "[name=\"hidden-field\"]";

pub fn token(value: &str) -> Token {
    Token::new(value, value)
}

pub fn values(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.value.as_str()).collect()
}

/// A form holding the tokenized input and a hidden field, with the tokenizer
/// initialized and token events recorded.
pub struct Fixture {
    pub doc: Document,
    pub form: Id,
    pub input: Id,
    pub hidden: Id,
    pub tokenizer: Tokenizer,
    pub events: Rc<RefCell<Vec<(String, Value)>>>,
}

impl Fixture {
    pub fn new(options: Value) -> Self {
        Self::with_tokens(options, Vec::new())
    }

    pub fn with_tokens(options: Value, tokens: Vec<Token>) -> Self {
        let mut doc = Document::new();
        let form = doc.create_element("form");
        let input = doc.create_element("input");
        let hidden = doc.create("input", &[("name", "hidden-field")]);
        doc.append_child(form, input).unwrap();
        doc.append_child(form, hidden).unwrap();
        doc.append_child(doc.body(), form).unwrap();

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        doc.listen(input, "tokenadded tokenremoved", move |event| {
            sink.borrow_mut()
                .push((event.name().to_string(), event.detail().clone()));
        });

        let mut map = match options {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        map.entry("hiddenSelector")
            .or_insert_with(|| Value::String(HIDDEN.into()));
        let mut tokenizer = Tokenizer::new(&doc, input, &map).unwrap();
        tokenizer.init(&mut doc, tokens).unwrap();
        Self {
            doc,
            form,
            input,
            hidden,
            tokenizer,
            events,
        }
    }

    pub fn container(&self) -> Id {
        self.tokenizer.container().unwrap()
    }

    pub fn chips(&self) -> Vec<Id> {
        self.doc.element_children(self.container())
    }

    pub fn event_names(&self) -> Vec<String> {
        self.events.borrow().iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn add(&mut self, value: &str) -> bool {
        self.tokenizer
            .add_token(&mut self.doc, token(value), None)
            .unwrap()
    }
}
