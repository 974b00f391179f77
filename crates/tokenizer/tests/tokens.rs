mod common;

use common::{Fixture, token, values};
use core_types::{KeyCode, PointerButton};
use serde_json::json;
use tokenizer::{Token, css};

#[test]
fn add_token_appends_and_renders_chip() {
    let mut fx = Fixture::new(json!({}));
    assert!(fx.add("foo"));
    assert_eq!(fx.tokenizer.tokens(), &[token("foo")]);
    let chips = fx.chips();
    assert_eq!(chips.len(), 1);
    assert_eq!(fx.doc.data(chips[0], "token"), Some(&json!({"label": "foo", "value": "foo"})));
    assert_eq!(fx.event_names(), ["tokenadded"]);
    assert_eq!(fx.events.borrow()[0].1["token"]["value"], "foo");
}

#[test]
fn add_token_at_index() {
    let mut fx = Fixture::new(json!({}));
    fx.add("foo");
    fx.add("bar");
    fx.tokenizer
        .add_token(&mut fx.doc, token("zee"), Some(1))
        .unwrap();
    assert_eq!(values(fx.tokenizer.tokens()), ["foo", "zee", "bar"]);

    fx.tokenizer
        .add_token(&mut fx.doc, token("end"), Some(99))
        .unwrap();
    assert_eq!(values(fx.tokenizer.tokens()), ["foo", "zee", "bar", "end"]);
}

#[test]
fn duplicates_are_rejected_by_default() {
    let mut fx = Fixture::new(json!({}));
    assert!(fx.add("foo"));
    assert!(!fx.add("foo"));
    assert_eq!(fx.tokenizer.tokens().len(), 1);
    assert_eq!(fx.event_names(), ["tokenadded"]);
}

#[test]
fn duplicates_allowed_when_configured() {
    let mut fx = Fixture::new(json!({ "allowDuplicates": true }));
    fx.add("foo");
    fx.add("foo");
    assert_eq!(values(fx.tokenizer.tokens()), ["foo", "foo"]);
    assert_eq!(fx.chips().len(), 2);
}

#[test]
fn remove_token_drops_entry_and_chip() {
    let mut fx = Fixture::new(json!({}));
    fx.add("foo");
    fx.add("bar");
    fx.add("zee");
    assert!(fx.tokenizer.remove_token(&mut fx.doc, &token("bar")).unwrap());
    assert_eq!(values(fx.tokenizer.tokens()), ["foo", "zee"]);
    let chips = fx.chips();
    assert_eq!(chips.len(), 2);
    assert_eq!(fx.doc.data(chips[1], "token").unwrap()["value"], "zee");
    assert_eq!(fx.event_names().last().map(String::as_str), Some("tokenremoved"));

    assert!(!fx.tokenizer.remove_token(&mut fx.doc, &token("nope")).unwrap());
}

#[test]
fn init_renders_initial_tokens_and_stores_string() {
    let fx = Fixture::with_tokens(json!({}), vec![token("foo"), token("bar"), token("zee")]);
    assert_eq!(fx.chips().len(), 3);
    assert_eq!(fx.doc.value(fx.hidden), "foo,bar,zee");
}

#[test]
fn container_sits_before_input() {
    let fx = Fixture::new(json!({}));
    let container = fx.container();
    assert!(fx.doc.has_class(container, css::TOKENIZER));
    assert_eq!(fx.doc.children(fx.form)[0], container);
    assert_eq!(fx.doc.children(fx.form)[1], fx.input);
}

#[test]
fn json_store() {
    let fx = Fixture::with_tokens(
        json!({ "store": "json" }),
        vec![token("foo"), token("bar"), token("zee")],
    );
    assert_eq!(fx.doc.value(fx.hidden), r#"["foo","bar","zee"]"#);
}

#[test]
fn inputs_store_replaces_fields_each_sync() {
    let mut fx = Fixture::with_tokens(
        json!({ "store": "inputs", "hiddenSelector": "my-field" }),
        vec![token("foo"), token("bar"), token("zee")],
    );
    let fields = fx.doc.many("[name=\"my-field\"]", None).unwrap();
    let stored: Vec<&str> = fields.iter().map(|f| fx.doc.value(*f)).collect();
    assert_eq!(stored, ["foo", "bar", "zee"]);

    fx.tokenizer.sync(&mut fx.doc).unwrap();
    let fields = fx.doc.many("[name=\"my-field\"]", None).unwrap();
    assert_eq!(fields.len(), 3);
    assert_eq!(fx.doc.attribute(fields[0], "type"), Some("hidden"));

    fx.tokenizer.remove_token(&mut fx.doc, &token("bar")).unwrap();
    let fields = fx.doc.many("[name=\"my-field\"]", None).unwrap();
    let stored: Vec<&str> = fields.iter().map(|f| fx.doc.value(*f)).collect();
    assert_eq!(stored, ["foo", "zee"]);
}

#[test]
fn enter_adds_trimmed_input_value_and_clears_input() {
    let mut fx = Fixture::new(json!({}));
    fx.doc.set_value(fx.input, "  foo ").unwrap();
    assert!(fx.tokenizer.on_keydown(&mut fx.doc, KeyCode::Enter).unwrap());
    assert_eq!(fx.tokenizer.tokens(), &[token("foo")]);
    assert_eq!(fx.doc.value(fx.input), "");
}

#[test]
fn enter_with_empty_input_does_nothing() {
    let mut fx = Fixture::new(json!({}));
    assert!(!fx.tokenizer.on_keydown(&mut fx.doc, KeyCode::Enter).unwrap());
    assert!(fx.tokenizer.tokens().is_empty());
}

#[test]
fn other_keys_do_nothing() {
    let mut fx = Fixture::new(json!({}));
    fx.doc.set_value(fx.input, "foo").unwrap();
    assert!(!fx.tokenizer.on_keydown(&mut fx.doc, KeyCode::Other(999)).unwrap());
    assert!(fx.tokenizer.tokens().is_empty());
    assert_eq!(fx.doc.value(fx.input), "foo");
}

#[test]
fn typeahead_mode_takes_token_from_input_slot() {
    let mut fx = Fixture::new(json!({ "typeahead": true }));
    fx.doc
        .set_data(fx.input, "token", json!({"label": "Foo", "value": "foo"}))
        .unwrap();
    assert!(fx.tokenizer.on_keydown(&mut fx.doc, KeyCode::Enter).unwrap());
    assert_eq!(fx.tokenizer.tokens(), &[Token::new("Foo", "foo")]);
    assert_eq!(fx.doc.data(fx.input, "token"), None);
}

#[test]
fn typeahead_mode_without_token_does_nothing() {
    let mut fx = Fixture::new(json!({ "typeahead": true }));
    fx.doc.set_value(fx.input, "foo").unwrap();
    fx.doc.set_data(fx.input, "token", json!(null)).unwrap();
    assert!(!fx.tokenizer.on_keydown(&mut fx.doc, KeyCode::Enter).unwrap());
    assert!(fx.tokenizer.tokens().is_empty());
}

#[test]
fn clicking_remove_control_removes_token() {
    let mut fx = Fixture::new(json!({}));
    fx.add("foo");
    fx.add("bar");
    let chip = fx.chips()[1];
    let remove = fx.doc.one(&format!(".{}", css::REMOVE), Some(chip)).unwrap().unwrap();
    assert!(fx.tokenizer.on_click(&mut fx.doc, remove, PointerButton::Primary).unwrap());
    assert_eq!(values(fx.tokenizer.tokens()), ["foo"]);
}

#[test]
fn clicking_elsewhere_or_with_other_button_keeps_token() {
    let mut fx = Fixture::new(json!({}));
    fx.add("foo");
    let chip = fx.chips()[0];
    assert!(!fx.tokenizer.on_click(&mut fx.doc, chip, PointerButton::Primary).unwrap());
    let remove = fx.doc.one(&format!(".{}", css::REMOVE), Some(chip)).unwrap().unwrap();
    assert!(!fx.tokenizer.on_click(&mut fx.doc, remove, PointerButton::Auxiliary).unwrap());
    assert_eq!(values(fx.tokenizer.tokens()), ["foo"]);
}

#[test]
fn sorted_adopts_chip_order() {
    let mut fx = Fixture::new(json!({}));
    fx.add("foo");
    fx.add("bar");
    fx.add("zee");
    let container = fx.container();
    let first = fx.chips()[0];
    fx.doc.append_child(container, first).unwrap();
    fx.tokenizer.on_sorted(&mut fx.doc).unwrap();
    assert_eq!(values(fx.tokenizer.tokens()), ["bar", "zee", "foo"]);
    assert_eq!(fx.doc.value(fx.hidden), "bar,zee,foo");
}

#[test]
fn destroy_removes_container_and_is_idempotent() {
    let mut fx = Fixture::new(json!({}));
    fx.tokenizer.destroy(&mut fx.doc).unwrap();
    assert!(fx.tokenizer.container().is_none());
    assert!(fx.doc.many(&format!(".{}", css::TOKENIZER), None).unwrap().is_empty());
    fx.tokenizer.destroy(&mut fx.doc).unwrap();

    fx.doc.set_value(fx.input, "foo").unwrap();
    assert!(!fx.tokenizer.on_keydown(&mut fx.doc, KeyCode::Enter).unwrap());
}

#[test]
fn destroy_before_init_is_safe() {
    let mut doc = dom::Document::new();
    let input = doc.create_element("input");
    doc.append_child(doc.body(), input).unwrap();
    let mut tokenizer = tokenizer::Tokenizer::new(&doc, input, &serde_json::Map::new()).unwrap();
    tokenizer.destroy(&mut doc).unwrap();
    tokenizer.destroy(&mut doc).unwrap();
}

#[test]
fn missing_hidden_field_is_not_an_error() {
    let mut fx = Fixture::new(json!({ "hiddenSelector": "[name=\"absent\"]" }));
    assert!(fx.add("foo"));
}

#[test]
fn churn_does_not_grow_the_document() {
    let mut fx = Fixture::new(json!({ "store": "inputs", "hiddenSelector": "my-field" }));
    fx.add("foo");
    fx.add("bar");
    let settled = fx.doc.node_count();
    for _ in 0..200 {
        assert!(fx.add("baz"));
        assert!(fx.tokenizer.remove_token(&mut fx.doc, &token("baz")).unwrap());
    }
    assert_eq!(fx.doc.node_count(), settled);
    assert_eq!(fx.chips().len(), 2);
    assert_eq!(fx.doc.many("[name=\"my-field\"]", None).unwrap().len(), 2);
}
