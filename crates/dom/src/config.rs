//! Option resolution: defaults, then caller options, then `data-*` attribute
//! overrides on the element.

use crate::error::ConfigError;
use crate::types::Id;
use crate::Document;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Merges `options` and the element's prefixed attributes over `defaults`.
/// Only keys present in `defaults` are considered.
pub fn config(
    doc: &Document,
    element: Id,
    defaults: &Map<String, Value>,
    options: &Map<String, Value>,
    prefix: &str,
) -> Map<String, Value> {
    let mut resolved = Map::new();
    for (key, default) in defaults {
        let mut value = options.get(key).unwrap_or(default).clone();
        let attribute = format!("{prefix}{}", dash_case(key));
        if let Some(raw) = doc.attribute(element, &attribute) {
            value = from_attribute(default, value, raw, &attribute);
        }
        resolved.insert(key.clone(), value);
    }
    resolved
}

/// [`config`] followed by deserialization into a typed options struct.
pub fn config_into<T: DeserializeOwned>(
    doc: &Document,
    element: Id,
    defaults: &Map<String, Value>,
    options: &Map<String, Value>,
    prefix: &str,
) -> Result<T, ConfigError> {
    let merged = config(doc, element, defaults, options, prefix);
    Ok(serde_json::from_value(Value::Object(merged))?)
}

fn from_attribute(default: &Value, current: Value, raw: &str, attribute: &str) -> Value {
    match default {
        Value::Number(_) => match parse_int(raw) {
            Some(n) => Value::from(n),
            None => {
                log::warn!(target: "dom.config", "ignoring non-integer {attribute}={raw:?}");
                current
            }
        },
        Value::Bool(false) => Value::Bool(true),
        Value::Bool(true) => Value::Bool(!matches!(raw.trim(), "false" | "0")),
        _ => Value::String(raw.to_string()),
    }
}

/// `maxItems` -> `max-items`.
pub fn dash_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;
    for ch in key.chars() {
        if ch.is_ascii_uppercase() && prev_lower {
            out.push('-');
        }
        prev_lower = ch.is_ascii_lowercase();
        out.push(ch.to_ascii_lowercase());
    }
    out
}

/// Leading integer prefix of `raw`, after optional whitespace and sign.
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    let n: i64 = digits[..end].parse().ok()?;
    Some(if negative { -n } else { n })
}
