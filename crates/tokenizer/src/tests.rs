use super::*;
use dom::Document;
use serde_json::{Map, Value, json};
use typeahead::RawItem;

fn setup(options: Value) -> (Document, dom::Id, Tokenizer) {
    let mut doc = Document::new();
    let form = doc.create_element("form");
    let input = doc.create_element("input");
    let hidden = doc.create("input", &[("name", "hidden-field")]);
    doc.append_child(form, input).unwrap();
    doc.append_child(form, hidden).unwrap();
    doc.append_child(doc.body(), form).unwrap();
    let options = match options {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let tokenizer = Tokenizer::new(&doc, input, &options).unwrap();
    (doc, input, tokenizer)
}

fn token(value: &str) -> Token {
    Token::new(value, value)
}

#[test]
fn defaults() {
    let (_, _, tokenizer) = setup(json!({}));
    assert_eq!(tokenizer.options(), &TokenizerOptions::default());
    assert_eq!(tokenizer.behaviour_names().coerce, "valueOnly");
    assert_eq!(tokenizer.behaviour_names().store, "string");
}

#[test]
fn attribute_overrides_store() {
    let mut doc = Document::new();
    let input = doc.create("input", &[("data-mh-tokenizer--store", "json")]);
    doc.append_child(doc.body(), input).unwrap();
    let tokenizer = Tokenizer::new(&doc, input, &Map::new()).unwrap();
    assert_eq!(tokenizer.behaviour_names().store, "json");
}

#[test]
fn unknown_behaviour_is_rejected() {
    let mut doc = Document::new();
    let input = doc.create_element("input");
    let mut options = Map::new();
    options.insert("store".into(), json!("carrier-pigeon"));
    match Tokenizer::new(&doc, input, &options) {
        Err(TokenizerError::UnknownBehaviour { role, name }) => {
            assert_eq!(role, "store");
            assert_eq!(name, "carrier-pigeon");
        }
        other => panic!("unexpected: {:?}", other.map(|_| ())),
    }
}

#[test]
fn default_chip_markup() {
    let (mut doc, _, tokenizer) = setup(json!({}));
    let chip = behaviours::default_chip(&tokenizer, &mut doc, &Token::new("Foo", "foo")).unwrap();
    assert_eq!(
        doc.outer_html(chip),
        "<div class=\"mh-token\"><div class=\"mh-token__label\">Foo</div>\
         <div class=\"mh-token__remove\"></div></div>"
    );
}

#[test]
fn default_container_markup() {
    let (mut doc, _, tokenizer) = setup(json!({}));
    let container = behaviours::default_container(&tokenizer, &mut doc).unwrap();
    assert_eq!(doc.outer_html(container), "<div class=\"mh-tokenizer\"></div>");
}

#[test]
fn value_only_coerces_text() {
    let (_, _, tokenizer) = setup(json!({}));
    let token = behaviours::value_only(&tokenizer, RawItem::from("foo")).unwrap();
    assert_eq!(token, Token::new("foo", "foo"));
}

#[test]
fn pass_through_rejects_text() {
    let (_, _, tokenizer) = setup(json!({}));
    assert!(behaviours::pass_through(&tokenizer, RawItem::from("foo")).is_err());
}

#[test]
fn sync_requires_init() {
    let (mut doc, _, mut tokenizer) = setup(json!({}));
    assert!(matches!(tokenizer.sync(&mut doc), Err(TokenizerError::NotInitialized)));
}

#[test]
fn store_none_leaves_hidden_field_alone() {
    let (mut doc, _, mut tokenizer) = setup(json!({
        "hiddenSelector": "[name=\"hidden-field\"]",
        "store": "none",
    }));
    tokenizer.init(&mut doc, vec![token("foo")]).unwrap();
    let hidden = doc.one("[name=\"hidden-field\"]", None).unwrap().unwrap();
    assert_eq!(doc.value(hidden), "");
}

#[test]
fn sortable_marks_chips_draggable() {
    let (mut doc, _, mut tokenizer) = setup(json!({ "sortable": true }));
    tokenizer.init(&mut doc, vec![token("foo")]).unwrap();
    let container = tokenizer.container().unwrap();
    let chip = doc.element_children(container)[0];
    assert_eq!(doc.attribute(chip, "draggable"), Some("true"));
}
