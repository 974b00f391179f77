#![no_main]

use dom::{Document, SelectorList};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(selector) = std::str::from_utf8(data) else {
        return;
    };
    let mut doc = Document::new();
    let list = doc.create("ul", &[("class", "items"), ("id", "list")]);
    let item = doc.create("li", &[("data-kind", "a b")]);
    doc.append_child(doc.body(), list).unwrap();
    doc.append_child(list, item).unwrap();

    if let Ok(parsed) = SelectorList::parse(selector) {
        let found = doc.many(selector, None).unwrap();
        for id in &found {
            assert!(parsed.matches(&doc, *id));
        }
        assert_eq!(doc.one(selector, None).unwrap(), found.first().copied());
    }
});
