use crate::error::HostError;
use crate::event::HostEvent;
use core_types::PointerButton;
use dom::{Document, Id};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tokenizer::{Token, Tokenizer};
use typeahead::{SelectOutcome, Typeahead};

#[derive(Default)]
struct Attached {
    typeahead: Option<Typeahead>,
    tokenizer: Option<Tokenizer>,
    /// Time of the latest unprocessed `input` event.
    last_input: Option<Instant>,
}

impl Attached {
    fn is_empty(&self) -> bool {
        self.typeahead.is_none() && self.tokenizer.is_none()
    }
}

/// Owns every widget instance, keyed by the input element it enhances.
///
/// The page forwards raw events through [`WidgetHost::handle`] and calls
/// [`WidgetHost::tick`] from its event loop; `tick` runs debounced updates
/// and applies settled fetches.
#[derive(Default)]
pub struct WidgetHost {
    widgets: BTreeMap<Id, Attached>,
}

impl WidgetHost {
    pub fn new() -> Self {
        Self::default()
    }

    // --- registry ---

    /// Builds a typeahead for `input` from `options` and initializes it.
    pub fn attach_typeahead(
        &mut self,
        doc: &mut Document,
        input: Id,
        options: &Map<String, Value>,
    ) -> Result<(), HostError> {
        let typeahead = Typeahead::new(doc, input, options)?;
        self.adopt_typeahead(doc, typeahead)
    }

    /// Takes ownership of a configured instance, e.g. one built against a
    /// private registry, and initializes it.
    pub fn adopt_typeahead(
        &mut self,
        doc: &mut Document,
        mut typeahead: Typeahead,
    ) -> Result<(), HostError> {
        let input = typeahead.input();
        if self.typeahead(input).is_some() {
            return Err(HostError::AlreadyAttached(input, "typeahead"));
        }
        typeahead.init(doc)?;
        self.widgets.entry(input).or_default().typeahead = Some(typeahead);
        log::debug!(target: "host", "typeahead attached to {input:?}");
        Ok(())
    }

    pub fn attach_tokenizer(
        &mut self,
        doc: &mut Document,
        input: Id,
        options: &Map<String, Value>,
        tokens: Vec<Token>,
    ) -> Result<(), HostError> {
        if self.tokenizer(input).is_some() {
            return Err(HostError::AlreadyAttached(input, "tokenizer"));
        }
        let mut tokenizer = Tokenizer::new(doc, input, options)?;
        tokenizer.init(doc, tokens)?;
        self.widgets.entry(input).or_default().tokenizer = Some(tokenizer);
        log::debug!(target: "host", "tokenizer attached to {input:?}");
        Ok(())
    }

    /// Destroys and forgets every widget attached to `input`. Returns
    /// whether anything was attached.
    pub fn detach(&mut self, doc: &mut Document, input: Id) -> Result<bool, HostError> {
        let Some(mut attached) = self.widgets.remove(&input) else {
            return Ok(false);
        };
        if let Some(typeahead) = attached.typeahead.as_mut() {
            typeahead.destroy(doc)?;
        }
        if let Some(tokenizer) = attached.tokenizer.as_mut() {
            tokenizer.destroy(doc)?;
        }
        Ok(true)
    }

    pub fn typeahead(&self, input: Id) -> Option<&Typeahead> {
        self.widgets.get(&input).and_then(|a| a.typeahead.as_ref())
    }

    pub fn typeahead_mut(&mut self, input: Id) -> Option<&mut Typeahead> {
        self.widgets.get_mut(&input).and_then(|a| a.typeahead.as_mut())
    }

    pub fn tokenizer(&self, input: Id) -> Option<&Tokenizer> {
        self.widgets.get(&input).and_then(|a| a.tokenizer.as_ref())
    }

    pub fn tokenizer_mut(&mut self, input: Id) -> Option<&mut Tokenizer> {
        self.widgets.get_mut(&input).and_then(|a| a.tokenizer.as_mut())
    }

    // --- routing ---

    /// Routes `event` to the widgets it concerns. Returns whether the
    /// event's default action should be prevented.
    pub fn handle(
        &mut self,
        doc: &mut Document,
        event: HostEvent,
        now: Instant,
    ) -> Result<bool, HostError> {
        log::trace!(target: "host", "{event:?}");
        match event {
            HostEvent::Input { input } => {
                if let Some(attached) = self.widgets.get_mut(&input) {
                    if attached.typeahead.is_some() {
                        attached.last_input = Some(now);
                    }
                }
                Ok(false)
            }
            HostEvent::Blur { input } => {
                if let Some(typeahead) = self.typeahead_mut(input) {
                    typeahead.on_blur(doc)?;
                }
                Ok(false)
            }
            HostEvent::KeyDown { input, key } => {
                let Some(attached) = self.widgets.get_mut(&input) else {
                    return Ok(false);
                };
                let mut prevent = false;
                if let Some(typeahead) = attached.typeahead.as_mut() {
                    prevent |= typeahead.on_keydown(doc, key)?;
                }
                if let Some(tokenizer) = attached.tokenizer.as_mut() {
                    prevent |= tokenizer.on_keydown(doc, key)?;
                }
                Ok(prevent)
            }
            HostEvent::PointerDown { target, button } => self.pointer_down(doc, target, button),
            HostEvent::TouchStart { target } => {
                self.pointer_down(doc, target, PointerButton::Primary)
            }
            HostEvent::Click { target, button } => {
                for attached in self.widgets.values_mut() {
                    let Some(tokenizer) = attached.tokenizer.as_mut() else {
                        continue;
                    };
                    if tokenizer.container().is_some_and(|c| doc.contains(c, target)) {
                        return Ok(tokenizer.on_click(doc, target, button)?);
                    }
                }
                Ok(false)
            }
            HostEvent::Sorted { container } => {
                for attached in self.widgets.values_mut() {
                    if let Some(tokenizer) = attached.tokenizer.as_mut() {
                        if tokenizer.container() == Some(container) {
                            tokenizer.on_sorted(doc)?;
                            break;
                        }
                    }
                }
                Ok(false)
            }
            HostEvent::WindowChange => {
                for attached in self.widgets.values_mut() {
                    if let Some(typeahead) = attached.typeahead.as_mut() {
                        typeahead.on_window_change(doc)?;
                    }
                }
                Ok(false)
            }
        }
    }

    /// Selection in a dropdown. A tokenizer on the same input picks up the
    /// token the typeahead handed over.
    fn pointer_down(
        &mut self,
        doc: &mut Document,
        target: Id,
        button: PointerButton,
    ) -> Result<bool, HostError> {
        for attached in self.widgets.values_mut() {
            let Some(typeahead) = attached.typeahead.as_mut() else {
                continue;
            };
            if !typeahead.container().is_some_and(|c| doc.contains(c, target)) {
                continue;
            }
            let outcome = typeahead.on_pointer_down(doc, target, button)?;
            if let (Some(SelectOutcome::Selected(_)), Some(tokenizer)) =
                (&outcome, attached.tokenizer.as_mut())
            {
                tokenizer.on_selected(doc)?;
            }
            return Ok(outcome.is_some());
        }
        Ok(false)
    }

    // --- time ---

    /// Runs every update whose quiet window has elapsed at `now`, then
    /// applies any fetch results that have arrived. Returns whether any
    /// widget changed.
    pub fn tick(&mut self, doc: &mut Document, now: Instant) -> Result<bool, HostError> {
        let mut changed = false;
        for (input, attached) in self.widgets.iter_mut() {
            let Some(typeahead) = attached.typeahead.as_mut() else {
                continue;
            };
            if let Some(at) = attached.last_input {
                let delay = Duration::from_millis(typeahead.options().debounce_delay);
                if now.saturating_duration_since(at) >= delay {
                    attached.last_input = None;
                    log::trace!(target: "host", "debounced update for {input:?}");
                    typeahead.refresh(doc)?;
                    changed = true;
                }
            }
            changed |= typeahead.pump(doc)?;
        }
        Ok(changed)
    }

    /// Applies settled fetches without running debounced updates.
    pub fn pump(&mut self, doc: &mut Document) -> Result<bool, HostError> {
        let mut changed = false;
        for attached in self.widgets.values_mut() {
            if let Some(typeahead) = attached.typeahead.as_mut() {
                changed |= typeahead.pump(doc)?;
            }
        }
        Ok(changed)
    }

    /// The earliest instant at which [`WidgetHost::tick`] has a debounced
    /// update to run.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.widgets
            .values()
            .filter_map(|attached| {
                let at = attached.last_input?;
                let typeahead = attached.typeahead.as_ref()?;
                Some(at + Duration::from_millis(typeahead.options().debounce_delay))
            })
            .min()
    }

    pub fn len(&self) -> usize {
        self.widgets.values().filter(|a| !a.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
