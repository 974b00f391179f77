use dom::{Document, Id};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Attribute prefix for per-element overrides, e.g.
/// `data-mh-typeahead--min-chars="3"`.
pub const PREFIX: &str = "data-mh-typeahead--";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeaheadOptions {
    /// Focus the first suggestion whenever the dropdown opens.
    pub auto_first: bool,
    /// Bypass the prefix cache in cache-aware fetch behaviours.
    pub disable_cache: bool,
    /// Selector of the hidden field written by the `setHidden` input behaviour.
    pub hidden_selector: String,
    /// Candidate source; its shape depends on the fetch behaviour.
    pub list: Value,
    pub max_items: usize,
    pub min_chars: usize,
    /// Tab selects the focused suggestion.
    pub must_match: bool,
    /// Quiet window, in milliseconds, before input triggers an update.
    pub debounce_delay: u64,
}

impl Default for TypeaheadOptions {
    fn default() -> Self {
        Self {
            auto_first: false,
            disable_cache: false,
            hidden_selector: String::new(),
            list: Value::Array(Vec::new()),
            max_items: 10,
            min_chars: 2,
            must_match: false,
            debounce_delay: 100,
        }
    }
}

/// The registered behaviour name chosen for each role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviourNames {
    pub coerce: String,
    pub element: String,
    pub fetch: String,
    pub filter: String,
    pub input: String,
    pub query: String,
    pub sort: String,
}

impl Default for BehaviourNames {
    fn default() -> Self {
        Self {
            coerce: "passThrough".into(),
            element: "default".into(),
            fetch: "array".into(),
            filter: "startswith".into(),
            input: "setValue".into(),
            query: "value".into(),
            sort: "length".into(),
        }
    }
}

/// The serialized form of `T::default()`, used as the base layer of
/// [`dom::config`].
pub fn defaults_map<T: Serialize + Default>() -> Map<String, Value> {
    match serde_json::to_value(T::default()) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Resolves a typed settings struct for `element` from its defaults, the
/// caller's `options` and the element's prefixed attributes.
pub fn resolve<T>(
    doc: &Document,
    element: Id,
    options: &Map<String, Value>,
    prefix: &str,
) -> Result<T, dom::ConfigError>
where
    T: Serialize + DeserializeOwned + Default,
{
    dom::config_into(doc, element, &defaults_map::<T>(), options, prefix)
}
