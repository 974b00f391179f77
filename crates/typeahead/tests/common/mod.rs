#![allow(dead_code)]

use dom::{Document, Id, Rect};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use typeahead::{BehaviourRegistry, Typeahead};

pub const EVENTS: &str = "opened closed focus select selected change";

pub fn opts(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

pub struct Fixture {
    pub doc: Document,
    pub input: Id,
    pub ta: Typeahead,
    pub events: Rc<RefCell<Vec<(String, Value)>>>,
}

impl Fixture {
    pub fn new(options: Value) -> Self {
        Self::with_registry(options, &BehaviourRegistry::builtin())
    }

    pub fn with_registry(options: Value, registry: &BehaviourRegistry) -> Self {
        Self::build(options, registry, None)
    }

    pub fn with_transport(options: Value, transport: Arc<dyn net::Transport>) -> Self {
        Self::build(options, &BehaviourRegistry::builtin(), Some(transport))
    }

    fn build(
        options: Value,
        registry: &BehaviourRegistry,
        transport: Option<Arc<dyn net::Transport>>,
    ) -> Self {
        let mut doc = Document::new();
        let form = doc.create_element("form");
        let input = doc.create("input", &[("type", "text")]);
        doc.append_child(doc.body(), form).unwrap();
        doc.append_child(form, input).unwrap();
        doc.set_bounding_rect(input, Rect::new(10.0, 20.0, 200.0, 30.0))
            .unwrap();

        let events = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&events);
        doc.listen(input, EVENTS, move |event| {
            log.borrow_mut()
                .push((event.name().to_string(), event.detail().clone()));
        });

        let mut ta = Typeahead::with_registry(&doc, input, &opts(options), registry).unwrap();
        if let Some(transport) = transport {
            ta = ta.with_transport(transport);
        }
        ta.init(&mut doc).unwrap();
        Self {
            doc,
            input,
            ta,
            events,
        }
    }

    pub fn event_names(&self) -> Vec<String> {
        self.events.borrow().iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events.borrow().iter().filter(|(n, _)| n == name).count()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn values(&self) -> Vec<String> {
        self.ta
            .suggestions()
            .iter()
            .map(|s| s.value.clone())
            .collect()
    }

    pub fn container(&self) -> Id {
        self.ta.container().unwrap()
    }

    pub fn rendered(&self) -> Vec<Id> {
        self.doc.element_children(self.container())
    }

    pub fn update(&mut self, query: &str) {
        self.ta.update(&mut self.doc, query).unwrap();
    }
}

/// The `['foo', 'foobar', 'bar']` list with `valueOnly` coercion.
pub fn foo_fixture() -> Fixture {
    Fixture::new(serde_json::json!({
        "list": ["foo", "foobar", "bar"],
        "coerce": "valueOnly",
    }))
}
