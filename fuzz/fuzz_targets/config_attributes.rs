#![no_main]

use dom::Document;
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value, json};

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    let mut doc = Document::new();
    let input = doc.create_element("input");
    for name in ["data-x--max-items", "data-x--must-match", "data-x--auto-first", "data-x--label"] {
        doc.set_attribute(input, name, raw).unwrap();
    }
    let defaults = match json!({
        "maxItems": 10,
        "mustMatch": false,
        "autoFirst": true,
        "label": "",
    }) {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let merged = dom::config(&doc, input, &defaults, &Map::new(), "data-x--");
    assert!(merged["maxItems"].is_i64() || merged["maxItems"].is_u64());
    assert!(merged["mustMatch"].is_boolean());
    assert!(merged["autoFirst"].is_boolean());
    assert_eq!(merged["label"], Value::String(raw.to_string()));
    let _ = dom::parse_int(raw);
});
