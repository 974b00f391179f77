use serde::{Deserialize, Serialize};

/// Attribute prefix for per-element overrides, e.g.
/// `data-mh-tokenizer--store="json"`.
pub const PREFIX: &str = "data-mh-tokenizer--";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenizerOptions {
    pub allow_duplicates: bool,
    /// Selector of the hidden field written by the `string` and `json`
    /// stores. The `inputs` store uses it as the `name` of the fields it
    /// creates.
    pub hidden_selector: String,
    /// Marks chips as draggable for an external reordering layer, which
    /// reports back through [`crate::Tokenizer::on_sorted`].
    pub sortable: bool,
    /// Take tokens from a cooperating typeahead instead of free text.
    pub typeahead: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerBehaviourNames {
    pub coerce: String,
    pub element: String,
    pub store: String,
    pub tokenizer: String,
}

impl Default for TokenizerBehaviourNames {
    fn default() -> Self {
        Self {
            coerce: "valueOnly".into(),
            element: "default".into(),
            store: "string".into(),
            tokenizer: "default".into(),
        }
    }
}
