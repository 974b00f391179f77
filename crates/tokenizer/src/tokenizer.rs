use crate::behaviours::TokenizerBehaviours;
use crate::css;
use crate::error::TokenizerError;
use crate::options::{PREFIX, TokenizerBehaviourNames, TokenizerOptions};
use core_types::{KeyCode, PointerButton};
use dom::{Document, Event, Id};
use serde_json::{Map, Value, json};
use typeahead::behaviours::input::TOKEN_SLOT;
use typeahead::{RawItem, Suggestion, options};

/// A chip value. Shares the suggestion shape so a typeahead can hand its
/// selection over unchanged.
pub type Token = Suggestion;

/// Data slot on each chip element holding the token it renders.
const CHIP_SLOT: &str = "token";

/// An ordered token list attached to a text input.
///
/// After every mutation the chips under the container are rebuilt from
/// `tokens` and the `store` behaviour persists the values, so chip order
/// always equals list order.
pub struct Tokenizer {
    input: Id,
    container: Option<Id>,
    options: TokenizerOptions,
    names: TokenizerBehaviourNames,
    behaviours: TokenizerBehaviours,
    tokens: Vec<Token>,
    hidden_inputs: Vec<Id>,
}

impl Tokenizer {
    pub fn new(
        doc: &Document,
        input: Id,
        options: &Map<String, Value>,
    ) -> Result<Self, TokenizerError> {
        let resolved: TokenizerOptions = options::resolve(doc, input, options, PREFIX)?;
        let names: TokenizerBehaviourNames = options::resolve(doc, input, options, PREFIX)?;
        let behaviours = TokenizerBehaviours::resolve(&names)?;
        Ok(Self {
            input,
            container: None,
            options: resolved,
            names,
            behaviours,
            tokens: Vec::new(),
            hidden_inputs: Vec::new(),
        })
    }

    pub fn input(&self) -> Id {
        self.input
    }

    /// The chip list element, present between `init` and `destroy`.
    pub fn container(&self) -> Option<Id> {
        self.container
    }

    pub fn options(&self) -> &TokenizerOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut TokenizerOptions {
        &mut self.options
    }

    pub fn behaviour_names(&self) -> &TokenizerBehaviourNames {
        &self.names
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub(crate) fn take_hidden_inputs(&mut self) -> Vec<Id> {
        std::mem::take(&mut self.hidden_inputs)
    }

    pub(crate) fn set_hidden_inputs(&mut self, fields: Vec<Id>) {
        self.hidden_inputs = fields;
    }

    // --- lifecycle ---

    /// Inserts the container ahead of the input and renders `tokens`. A
    /// second call is a no-op.
    pub fn init(&mut self, doc: &mut Document, tokens: Vec<Token>) -> Result<(), TokenizerError> {
        if self.container.is_some() {
            return Ok(());
        }
        let container = (self.behaviours.tokenizer)(self, doc)?;
        match doc.parent(self.input) {
            Some(parent) => doc.insert_before(parent, container, Some(self.input))?,
            None => doc.append_child(doc.body(), container)?,
        }
        self.container = Some(container);
        self.tokens = tokens;
        self.sync(doc)
    }

    /// Removes the container and any hidden fields this instance created.
    /// Safe to call repeatedly or before `init`.
    pub fn destroy(&mut self, doc: &mut Document) -> Result<(), TokenizerError> {
        for field in self.take_hidden_inputs() {
            doc.remove_subtree(field)?;
        }
        if let Some(container) = self.container.take() {
            doc.remove_subtree(container)?;
        }
        Ok(())
    }

    // --- list mutation ---

    /// Inserts `token` at `index` (clamped) or appends it. Returns false when
    /// the value is already present and duplicates are not allowed.
    pub fn add_token(
        &mut self,
        doc: &mut Document,
        token: Token,
        index: Option<usize>,
    ) -> Result<bool, TokenizerError> {
        if !self.options.allow_duplicates && self.tokens.iter().any(|t| t.value == token.value) {
            log::debug!(target: "tokenizer", "duplicate token {:?} ignored", token.value);
            return Ok(false);
        }
        let at = index.map_or(self.tokens.len(), |i| i.min(self.tokens.len()));
        let detail = json!({ "token": token.to_json() });
        self.tokens.insert(at, token);
        self.sync(doc)?;
        doc.dispatch(Event::new("tokenadded", self.input).with_detail(detail).non_cancelable());
        Ok(true)
    }

    /// Coerces free text through the `coerce` behaviour and adds it.
    pub fn add_raw(&mut self, doc: &mut Document, item: RawItem) -> Result<bool, TokenizerError> {
        let token = (self.behaviours.coerce)(self, item)?;
        self.add_token(doc, token, None)
    }

    /// Removes the first token equal to `token`.
    pub fn remove_token(&mut self, doc: &mut Document, token: &Token) -> Result<bool, TokenizerError> {
        let Some(at) = self.tokens.iter().position(|t| t == token) else {
            return Ok(false);
        };
        let removed = self.tokens.remove(at);
        self.sync(doc)?;
        let detail = json!({ "token": removed.to_json() });
        doc.dispatch(Event::new("tokenremoved", self.input).with_detail(detail).non_cancelable());
        Ok(true)
    }

    /// Rebuilds every chip from the token list and runs the store.
    pub fn sync(&mut self, doc: &mut Document) -> Result<(), TokenizerError> {
        let container = self.container.ok_or(TokenizerError::NotInitialized)?;
        doc.discard_children(container)?;
        for token in &self.tokens {
            let chip = (self.behaviours.element)(self, doc, token)?;
            doc.set_data(chip, CHIP_SLOT, token.to_json())?;
            if self.options.sortable {
                doc.set_attribute(chip, "draggable", "true")?;
            }
            doc.append_child(container, chip)?;
        }
        let store = self.behaviours.store;
        store(self, doc)
    }

    // --- host events ---

    /// Enter adds a token: the trimmed input text, or in typeahead mode the
    /// token the typeahead left on the input. Returns whether a token was
    /// added, in which case the input is cleared.
    pub fn on_keydown(&mut self, doc: &mut Document, key: KeyCode) -> Result<bool, TokenizerError> {
        if key != KeyCode::Enter || self.container.is_none() {
            return Ok(false);
        }
        if self.options.typeahead {
            return self.on_selected(doc);
        }
        let text = doc.value(self.input).trim().to_string();
        if text.is_empty() {
            return Ok(false);
        }
        let added = self.add_raw(doc, RawItem::from(text.as_str()))?;
        doc.set_value(self.input, "")?;
        Ok(added)
    }

    /// A cooperating typeahead selected a suggestion. Only meaningful in
    /// typeahead mode.
    pub fn on_selected(&mut self, doc: &mut Document) -> Result<bool, TokenizerError> {
        if !self.options.typeahead || self.container.is_none() {
            return Ok(false);
        }
        let token = match doc.take_data(self.input, TOKEN_SLOT) {
            None | Some(Value::Null) => return Ok(false),
            Some(value) => serde_json::from_value::<Token>(value)?,
        };
        let added = self.add_token(doc, token, None)?;
        doc.set_value(self.input, "")?;
        Ok(added)
    }

    /// A primary click on a chip's remove control removes that chip's token.
    pub fn on_click(
        &mut self,
        doc: &mut Document,
        target: Id,
        button: PointerButton,
    ) -> Result<bool, TokenizerError> {
        let Some(container) = self.container else {
            return Ok(false);
        };
        if !button.is_primary() || !doc.has_class(target, css::REMOVE) {
            return Ok(false);
        }
        if !doc.contains(container, target) {
            return Ok(false);
        }
        let mut chip = target;
        while let Some(parent) = doc.parent(chip) {
            if parent == container {
                break;
            }
            chip = parent;
        }
        let Some(index) = doc.element_children(container).iter().position(|c| *c == chip) else {
            return Ok(false);
        };
        let Some(token) = self.tokens.get(index).cloned() else {
            return Ok(false);
        };
        self.remove_token(doc, &token)
    }

    /// The chips were reordered in the DOM; adopt their order.
    pub fn on_sorted(&mut self, doc: &mut Document) -> Result<(), TokenizerError> {
        let container = self.container.ok_or(TokenizerError::NotInitialized)?;
        let mut tokens = Vec::with_capacity(self.tokens.len());
        for chip in doc.element_children(container) {
            match doc.data(chip, CHIP_SLOT) {
                Some(value) => tokens.push(serde_json::from_value::<Token>(value.clone())?),
                None => log::warn!(target: "tokenizer", "chip {chip:?} carries no token"),
            }
        }
        self.tokens = tokens;
        self.sync(doc)
    }
}
