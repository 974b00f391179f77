use crate::error::BehaviourError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A coerced candidate shown in the dropdown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub label: String,
    pub value: String,
    /// Any further fields of the fetched item.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Suggestion {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            extra: Map::new(),
        }
    }

    /// A suggestion whose label is its value.
    pub fn from_value(value: impl Into<String>) -> Self {
        let value = value.into();
        Self::new(value.clone(), value)
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// An item as a fetch behaviour produced it, before coercion.
#[derive(Clone, Debug, PartialEq)]
pub enum RawItem {
    Suggestion(Suggestion),
    Value(Value),
}

impl RawItem {
    /// Accepts only items that are already shaped; those are moved through
    /// untouched.
    pub fn into_shaped(self) -> Result<Suggestion, BehaviourError> {
        match self {
            RawItem::Suggestion(suggestion) => Ok(suggestion),
            RawItem::Value(value) => Err(BehaviourError::Uncoercible(value.to_string())),
        }
    }

    /// Uses a scalar item as both label and value. A shaped item keeps its
    /// value and extra fields and takes the value as its label.
    pub fn into_value_only(self) -> Result<Suggestion, BehaviourError> {
        match self {
            RawItem::Value(Value::String(s)) => Ok(Suggestion::from_value(s)),
            RawItem::Value(Value::Number(n)) => Ok(Suggestion::from_value(n.to_string())),
            RawItem::Suggestion(suggestion) => Ok(Suggestion {
                label: suggestion.value.clone(),
                ..suggestion
            }),
            RawItem::Value(other) => Err(BehaviourError::Uncoercible(other.to_string())),
        }
    }
}

impl From<Suggestion> for RawItem {
    fn from(suggestion: Suggestion) -> Self {
        RawItem::Suggestion(suggestion)
    }
}

impl From<&str> for RawItem {
    fn from(value: &str) -> Self {
        RawItem::Value(Value::String(value.to_string()))
    }
}

/// Objects carrying string `label` and `value` fields become shaped
/// suggestions; anything else stays an opaque value.
impl From<Value> for RawItem {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(mut map)
                if map.get("label").is_some_and(Value::is_string)
                    && map.get("value").is_some_and(Value::is_string) =>
            {
                let label = take_string(&mut map, "label");
                let value = take_string(&mut map, "value");
                RawItem::Suggestion(Suggestion {
                    label,
                    value,
                    extra: map,
                })
            }
            other => RawItem::Value(other),
        }
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> String {
    match map.remove(key) {
        Some(Value::String(s)) => s,
        _ => String::new(),
    }
}
