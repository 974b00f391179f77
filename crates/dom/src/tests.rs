use super::*;
use serde_json::{Map, Value, json};
use std::cell::RefCell;
use std::rc::Rc;

fn defaults() -> Map<String, Value> {
    let Value::Object(map) = json!({
        "autoFirst": false,
        "hiddenSelector": "",
        "maxItems": 10,
        "sortable": true,
    }) else {
        unreachable!()
    };
    map
}

#[test]
fn new_document_has_body_under_html() {
    let doc = Document::new();
    let body = doc.body();
    assert_eq!(doc.tag_name(body), Some("body"));
    let html = doc.parent(body).expect("html");
    assert_eq!(doc.tag_name(html), Some("html"));
    assert_eq!(doc.parent(html), Some(doc.root()));
    assert!(doc.is_connected(body));
}

#[test]
fn append_moves_node_between_parents() {
    let mut doc = Document::new();
    let a = doc.create_element("div");
    let b = doc.create_element("div");
    let child = doc.create_element("span");
    doc.append_child(a, child).unwrap();
    doc.append_child(b, child).unwrap();
    assert!(doc.children(a).is_empty());
    assert_eq!(doc.children(b), &[child]);
    assert_eq!(doc.parent(child), Some(b));
}

#[test]
fn insert_before_places_ahead_of_sibling() {
    let mut doc = Document::new();
    let parent = doc.create_element("div");
    let first = doc.create_element("input");
    let second = doc.create_element("div");
    doc.append_child(parent, first).unwrap();
    doc.insert_before(parent, second, Some(first)).unwrap();
    assert_eq!(doc.children(parent), &[second, first]);
}

#[test]
fn insert_rejects_cycles_and_text_parents() {
    let mut doc = Document::new();
    let outer = doc.create_element("div");
    let inner = doc.create_element("div");
    doc.append_child(outer, inner).unwrap();
    assert_eq!(
        doc.append_child(inner, outer),
        Err(DomError::CycleDetected {
            parent: inner,
            child: outer,
        })
    );
    let text = doc.create_text("x");
    assert_eq!(
        doc.append_child(text, inner),
        Err(DomError::InvalidParent(text))
    );
}

#[test]
fn remove_child_requires_parentage() {
    let mut doc = Document::new();
    let parent = doc.create_element("div");
    let stranger = doc.create_element("div");
    assert!(matches!(
        doc.remove_child(parent, stranger),
        Err(DomError::NotAChild { .. })
    ));
}

#[test]
fn class_list_add_remove() {
    let mut doc = Document::new();
    let el = doc.create("div", &[("class", "mh-typeahead")]);
    doc.add_class(el, "mh-typeahead--open").unwrap();
    doc.add_class(el, "mh-typeahead--open").unwrap();
    assert_eq!(
        doc.attribute(el, "class"),
        Some("mh-typeahead mh-typeahead--open")
    );
    doc.remove_class(el, "mh-typeahead--open").unwrap();
    assert!(!doc.has_class(el, "mh-typeahead--open"));
    assert!(doc.has_class(el, "mh-typeahead"));
}

#[test]
fn create_seeds_value_property() {
    let mut doc = Document::new();
    let el = doc.create("input", &[("type", "hidden"), ("value", "foo")]);
    assert_eq!(doc.value(el), "foo");
    doc.set_value(el, "bar").unwrap();
    assert_eq!(doc.value(el), "bar");
    assert_eq!(doc.attribute(el, "value"), Some("foo"));
}

#[test]
fn outer_html_serializes_attributes_style_and_escapes() {
    let mut doc = Document::new();
    let el = doc.create("div", &[("class", "a\"b")]);
    doc.set_style(el, "top", "10px").unwrap();
    doc.set_text_content(el, "x < y & z").unwrap();
    let input = doc.create("input", &[("type", "text")]);
    doc.append_child(el, input).unwrap();
    assert_eq!(
        doc.outer_html(el),
        "<div class=\"a&quot;b\" style=\"top: 10px;\">x &lt; y &amp; z<input type=\"text\"></div>"
    );
}

#[test]
fn text_content_concatenates_descendants() {
    let mut doc = Document::new();
    let el = doc.create_element("div");
    let mark = doc.create_element("mark");
    let a = doc.create_text("fo");
    let b = doc.create_text("obar");
    doc.append_child(mark, a).unwrap();
    doc.append_child(el, mark).unwrap();
    doc.append_child(el, b).unwrap();
    assert_eq!(doc.text_content(el), "foobar");
}

#[test]
fn selectors_match_compounds_and_combinators() {
    let mut doc = Document::new();
    let form = doc.create("form", &[("id", "signup")]);
    let list = doc.create("ul", &[("class", "items wide")]);
    let li1 = doc.create("li", &[("data-kind", "a")]);
    let li2 = doc.create("li", &[("data-kind", "b")]);
    let hidden = doc.create("input", &[("type", "hidden"), ("name", "tags")]);
    doc.append_child(doc.body(), form).unwrap();
    doc.append_child(form, list).unwrap();
    doc.append_child(list, li1).unwrap();
    doc.append_child(list, li2).unwrap();
    doc.append_child(form, hidden).unwrap();

    assert_eq!(doc.many("li", None).unwrap(), vec![li1, li2]);
    assert_eq!(doc.one("#signup .items > li", None).unwrap(), Some(li1));
    assert_eq!(doc.one("li[data-kind=\"b\"]", None).unwrap(), Some(li2));
    assert_eq!(doc.one("[name=tags]", None).unwrap(), Some(hidden));
    assert_eq!(doc.one("form > li", None).unwrap(), None);
    assert_eq!(doc.many("ul.wide, input", Some(form)).unwrap(), vec![list, hidden]);
    assert_eq!(doc.many("*", Some(list)).unwrap(), vec![li1, li2]);
}

#[test]
fn selector_scope_excludes_the_scope_itself() {
    let mut doc = Document::new();
    let outer = doc.create("div", &[("class", "x")]);
    doc.append_child(doc.body(), outer).unwrap();
    assert_eq!(doc.one(".x", Some(outer)).unwrap(), None);
    assert_eq!(doc.one(".x", None).unwrap(), Some(outer));
}

#[test]
fn malformed_selectors_are_errors() {
    let doc = Document::new();
    for bad in ["", "div >", "[=x]", "a,", "#", "div[x"] {
        assert!(
            matches!(doc.one(bad, None), Err(DomError::InvalidSelector { .. })),
            "{bad:?} should not parse"
        );
    }
}

#[test]
fn dispatch_bubbles_and_reports_prevent_default() {
    let mut doc = Document::new();
    let parent = doc.create_element("div");
    let child = doc.create_element("input");
    doc.append_child(parent, child).unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    doc.listen(parent, "select", move |event| {
        log.borrow_mut().push(event.detail().clone());
        event.prevent_default();
    });

    assert!(!doc.dispatch_on(child, "select", json!({"suggestion": "foo"})));
    assert_eq!(seen.borrow().as_slice(), &[json!({"suggestion": "foo"})]);

    assert!(doc.dispatch(Event::new("select", child).non_cancelable()));
    assert!(doc.dispatch_on(child, "opened", Value::Null));
}

#[test]
fn listen_registers_many_names_and_ignore_removes() {
    let mut doc = Document::new();
    let count = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&count);
    let id = doc.listen(EventTarget::Window, "resize orientationchange", move |_| {
        *counter.borrow_mut() += 1;
    });
    doc.dispatch(Event::new("resize", EventTarget::Window));
    doc.dispatch(Event::new("orientationchange", EventTarget::Window));
    doc.dispatch(Event::new("scroll", EventTarget::Window));
    assert_eq!(*count.borrow(), 2);

    assert!(doc.ignore(id));
    assert!(!doc.ignore(id));
    doc.dispatch(Event::new("resize", EventTarget::Window));
    assert_eq!(*count.borrow(), 2);
    assert_eq!(doc.listener_count(), 0);
}

#[test]
fn config_layers_options_then_attributes() {
    let mut doc = Document::new();
    let el = doc.create(
        "input",
        &[
            ("data-mh-typeahead--max-items", "5px"),
            ("data-mh-typeahead--auto-first", ""),
            ("data-mh-typeahead--hidden-selector", "#real"),
        ],
    );
    let mut options = Map::new();
    options.insert("maxItems".into(), json!(3));
    options.insert("unknown".into(), json!(true));

    let resolved = config(&doc, el, &defaults(), &options, "data-mh-typeahead--");
    assert_eq!(resolved["maxItems"], json!(5));
    assert_eq!(resolved["autoFirst"], json!(true));
    assert_eq!(resolved["hiddenSelector"], json!("#real"));
    assert_eq!(resolved["sortable"], json!(true));
    assert!(!resolved.contains_key("unknown"));
}

#[test]
fn config_keeps_previous_value_for_unparsable_integer() {
    let mut doc = Document::new();
    let el = doc.create("input", &[("data-x--max-items", "lots")]);
    let mut options = Map::new();
    options.insert("maxItems".into(), json!(7));
    let resolved = config(&doc, el, &defaults(), &options, "data-x--");
    assert_eq!(resolved["maxItems"], json!(7));
}

#[test]
fn config_into_reports_type_mismatch() {
    #[derive(serde::Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    #[allow(dead_code)]
    struct Opts {
        max_items: usize,
    }
    let mut doc = Document::new();
    let el = doc.create_element("input");
    let mut options = Map::new();
    options.insert("maxItems".into(), json!("many"));
    let result: Result<Opts, _> = config_into(&doc, el, &defaults(), &options, "data-x--");
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn dash_case_and_parse_int() {
    assert_eq!(dash_case("maxItems"), "max-items");
    assert_eq!(dash_case("allowDuplicates"), "allow-duplicates");
    assert_eq!(dash_case("list"), "list");
    assert_eq!(parse_int(" 42abc"), Some(42));
    assert_eq!(parse_int("-3"), Some(-3));
    assert_eq!(parse_int("abc"), None);
    assert_eq!(parse_int(""), None);
}

#[test]
fn remove_subtree_frees_ids_for_reuse() {
    let mut doc = Document::new();
    let baseline = doc.node_count();
    let list = doc.create_element("ul");
    let item = doc.create_element("li");
    let text = doc.create_text("one");
    doc.append_child(doc.body(), list).unwrap();
    doc.append_child(list, item).unwrap();
    doc.append_child(item, text).unwrap();
    doc.listen(item, "click", |_| {});
    assert_eq!(doc.node_count(), baseline + 3);

    doc.remove_subtree(list).unwrap();
    assert_eq!(doc.node_count(), baseline);
    assert!(doc.children(doc.body()).is_empty());
    assert_eq!(doc.listener_count(), 0);
    assert_eq!(doc.tag_name(item), None);
    assert_eq!(doc.append_child(doc.body(), item), Err(DomError::UnknownNode(item)));

    let reused = doc.create_element("p");
    assert!([list, item, text].contains(&reused));
    assert_eq!(doc.tag_name(reused), Some("p"));
    assert!(doc.children(reused).is_empty());
    assert!(doc.parent(reused).is_none());
}

#[test]
fn remove_subtree_refuses_the_body_and_its_ancestors() {
    let mut doc = Document::new();
    let body = doc.body();
    let html = doc.parent(body).unwrap();
    for id in [doc.root(), html, body] {
        assert_eq!(doc.remove_subtree(id), Err(DomError::Protected(id)));
    }
    assert!(doc.is_connected(body));
}

#[test]
fn repeated_text_replacement_keeps_node_count_flat() {
    let mut doc = Document::new();
    let span = doc.create_element("span");
    doc.append_child(doc.body(), span).unwrap();
    doc.set_text_content(span, "a").unwrap();
    let settled = doc.node_count();
    for i in 0..100 {
        doc.set_text_content(span, &i.to_string()).unwrap();
    }
    assert_eq!(doc.node_count(), settled);
    assert_eq!(doc.text_content(span), "99");
}

#[test]
fn discard_children_empties_parent() {
    let mut doc = Document::new();
    let list = doc.create_element("ul");
    doc.append_child(doc.body(), list).unwrap();
    for _ in 0..3 {
        let item = doc.create_element("li");
        doc.append_child(list, item).unwrap();
    }
    let before = doc.node_count();
    doc.discard_children(list).unwrap();
    assert!(doc.children(list).is_empty());
    assert_eq!(doc.node_count(), before - 3);
}

#[test]
fn commas_inside_attribute_values_do_not_split_the_list() {
    let mut doc = Document::new();
    let both = doc.create("input", &[("value", "a,b")]);
    let plain = doc.create("input", &[("value", "a")]);
    let marked = doc.create("p", &[("class", "x")]);
    for id in [both, plain, marked] {
        doc.append_child(doc.body(), id).unwrap();
    }
    assert_eq!(doc.many("[value=\"a,b\"]", None).unwrap(), [both]);
    assert_eq!(doc.many("[value='a,b'], .x", None).unwrap(), [both, marked]);
    assert!(doc.one("[value=\"a,b\"],", None).is_err());
}
