use crate::cache::SuggestionCache;
use crate::css;
use crate::error::TypeaheadError;
use crate::options::{self, BehaviourNames, PREFIX, TypeaheadOptions};
use crate::pipeline::{self, CancelToken, FetchContext, FetchReply, FetchResult, InFlight};
use crate::registry::{self, BehaviourRegistry, ResolvedBehaviours};
use crate::suggestion::{RawItem, Suggestion};
use core_types::{Generation, KeyCode, PointerButton};
use dom::{Document, Event, Id};
use net::{Transport, UreqTransport};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tools::text::char_len;

/// Why the dropdown closed; sent as the `reason` detail of `closed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseReason {
    Blur,
    Resize,
    Escape,
    NoMatches,
    Error,
    Select,
    Query,
    Destroy,
    Explicit,
}

impl CloseReason {
    pub fn as_str(self) -> &'static str {
        match self {
            CloseReason::Blur => "blur",
            CloseReason::Resize => "resize",
            CloseReason::Escape => "escape",
            CloseReason::NoMatches => "no-matches",
            CloseReason::Error => "error",
            CloseReason::Select => "select",
            CloseReason::Query => "query",
            CloseReason::Destroy => "destroy",
            CloseReason::Explicit => "explicit",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SelectOutcome {
    Selected(Suggestion),
    /// A `select` listener prevented the default action.
    Vetoed,
    NothingFocused,
}

/// A suggestion dropdown attached to one text input.
pub struct Typeahead {
    input: Id,
    container: Option<Id>,
    options: TypeaheadOptions,
    names: BehaviourNames,
    behaviours: ResolvedBehaviours,
    transport: Arc<dyn Transport>,
    cache: SuggestionCache,
    suggestions: Vec<Suggestion>,
    index: Option<usize>,
    open: bool,
    generation: Generation,
    cancel: CancelToken,
    in_flight: Vec<InFlight>,
}

impl Typeahead {
    /// Configures an instance for `input` against the global registry.
    pub fn new(
        doc: &Document,
        input: Id,
        options: &Map<String, Value>,
    ) -> Result<Self, TypeaheadError> {
        registry::with_global(|registry| Self::with_registry(doc, input, options, registry))
    }

    pub fn with_registry(
        doc: &Document,
        input: Id,
        options: &Map<String, Value>,
        registry: &BehaviourRegistry,
    ) -> Result<Self, TypeaheadError> {
        let resolved: TypeaheadOptions = options::resolve(doc, input, options, PREFIX)?;
        let names: BehaviourNames = options::resolve(doc, input, options, PREFIX)?;
        let behaviours = registry.resolve(&names);
        Ok(Self {
            input,
            container: None,
            options: resolved,
            names,
            behaviours,
            transport: Arc::new(UreqTransport::new()),
            cache: SuggestionCache::new(),
            suggestions: Vec::new(),
            index: None,
            open: false,
            generation: Generation::INITIAL,
            cancel: CancelToken::new(Generation::INITIAL),
            in_flight: Vec::new(),
        })
    }

    /// Replaces the HTTP transport used by the `ajax` fetch behaviour.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    // --- accessors ---

    pub fn input(&self) -> Id {
        self.input
    }

    /// The floating suggestion container, once initialized.
    pub fn container(&self) -> Option<Id> {
        self.container
    }

    pub fn options(&self) -> &TypeaheadOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut TypeaheadOptions {
        &mut self.options
    }

    pub fn behaviour_names(&self) -> &BehaviourNames {
        &self.names
    }

    pub fn behaviours(&self) -> &ResolvedBehaviours {
        &self.behaviours
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    pub fn cache(&self) -> &SuggestionCache {
        &self.cache
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn focused(&self) -> Option<&Suggestion> {
        self.index.and_then(|i| self.suggestions.get(i))
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn suggestion_count(&self) -> usize {
        self.suggestions.len()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// True while a fetch for the current generation has not settled.
    pub fn is_pending(&self) -> bool {
        self.in_flight
            .iter()
            .any(|f| f.generation == self.generation && !self.cancel.is_cancelled())
    }

    fn require_container(&self) -> Result<Id, TypeaheadError> {
        self.container.ok_or(TypeaheadError::NotInitialized)
    }

    // --- lifecycle ---

    /// Creates the dropdown container at the end of `<body>` and turns off
    /// browser autocomplete on the input.
    pub fn init(&mut self, doc: &mut Document) -> Result<(), TypeaheadError> {
        if self.container.is_some() {
            return Ok(());
        }
        self.suggestions.clear();
        self.cache.clear();
        doc.set_attribute(self.input, "autocomplete", "off")?;
        let container = doc.create("div", &[("class", css::TYPEAHEAD)]);
        doc.append_child(doc.body(), container)?;
        self.container = Some(container);
        Ok(())
    }

    /// Closes, cancels outstanding fetches and removes the container.
    pub fn destroy(&mut self, doc: &mut Document) -> Result<(), TypeaheadError> {
        self.close_with(doc, CloseReason::Destroy)?;
        self.in_flight.clear();
        if let Some(container) = self.container.take() {
            doc.remove_subtree(container)?;
        }
        self.cache.clear();
        self.suggestions.clear();
        self.index = None;
        Ok(())
    }

    // --- pipeline ---

    /// Reads the query through the `query` behaviour and updates.
    pub fn refresh(&mut self, doc: &mut Document) -> Result<(), TypeaheadError> {
        let query = self.behaviours.query()?;
        let q = query(self, doc);
        self.update(doc, &q)
    }

    /// Runs the suggestion pipeline for `query`. Fetches that reply
    /// immediately are applied before returning; pending ones are applied by
    /// [`Typeahead::pump`] or [`Typeahead::settle`] if still current.
    pub fn update(&mut self, doc: &mut Document, query: &str) -> Result<(), TypeaheadError> {
        self.require_container()?;
        self.cancel.cancel();
        self.generation = self.generation.next();
        self.cancel = CancelToken::new(self.generation);

        if query.is_empty() {
            self.clear(doc)?;
            return self.close_and_clear(doc, CloseReason::Query);
        }
        if char_len(query) < self.options.min_chars {
            return self.close_and_clear(doc, CloseReason::Query);
        }

        let fetch = self.behaviours.fetch()?;
        let reply = {
            let ctx = FetchContext {
                typeahead: self,
                doc: &*doc,
            };
            fetch(&ctx, query, self.cancel.clone())
        };
        match reply {
            FetchReply::Ready(result) => self.apply(doc, query, result),
            FetchReply::Pending(fetch) => {
                log::trace!(
                    target: "typeahead.pipeline",
                    "generation {} pending for {query:?}",
                    self.generation.as_raw()
                );
                self.in_flight.push(InFlight {
                    generation: self.generation,
                    query: query.to_string(),
                    fetch,
                });
                Ok(())
            }
        }
    }

    /// Applies whatever in-flight fetches have settled, without blocking.
    /// Returns whether the current generation's result was applied.
    pub fn pump(&mut self, doc: &mut Document) -> Result<bool, TypeaheadError> {
        let mut applied = false;
        let mut still_waiting = Vec::new();
        for flight in std::mem::take(&mut self.in_flight) {
            match flight.fetch.try_settle() {
                Some(result) => applied |= self.settled(doc, flight, result)?,
                None => still_waiting.push(flight),
            }
        }
        // Anything pushed while settling belongs to a newer generation.
        still_waiting.append(&mut self.in_flight);
        self.in_flight = still_waiting;
        Ok(applied)
    }

    /// Blocks until the current generation settles or `timeout` elapses,
    /// pumping older arrivals on the way. Returns whether a result was
    /// applied.
    pub fn settle(&mut self, doc: &mut Document, timeout: Duration) -> Result<bool, TypeaheadError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.pump(doc)? {
                return Ok(true);
            }
            if !self.is_pending() {
                return Ok(false);
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(false);
            }
            let wait = (deadline - now).min(Duration::from_millis(10));
            let current = self.in_flight.iter().position(|f| f.generation == self.generation);
            if let Some(at) = current {
                if let Some(result) = self.in_flight[at].fetch.wait(wait) {
                    let flight = self.in_flight.remove(at);
                    return self.settled(doc, flight, result);
                }
            }
        }
    }

    fn settled(
        &mut self,
        doc: &mut Document,
        flight: InFlight,
        result: FetchResult,
    ) -> Result<bool, TypeaheadError> {
        let current = flight.generation == self.generation && !self.cancel.is_cancelled();
        if !current {
            if let Ok(batch) = &result {
                self.remember(batch.cache_key.clone(), &batch.items);
            }
            log::debug!(
                target: "typeahead.pipeline",
                "dropping stale result of generation {} for {:?}",
                flight.generation.as_raw(),
                flight.query
            );
            return Ok(false);
        }
        self.apply(doc, &flight.query, result)?;
        Ok(true)
    }

    fn remember(&mut self, key: Option<String>, items: &[RawItem]) {
        if let Some(key) = key {
            if !self.options.disable_cache {
                self.cache.insert(key, items.to_vec());
            }
        }
    }

    fn apply(
        &mut self,
        doc: &mut Document,
        query: &str,
        result: FetchResult,
    ) -> Result<(), TypeaheadError> {
        let batch = match result {
            Ok(batch) => batch,
            Err(err) => {
                log::debug!(target: "typeahead.pipeline", "fetch for {query:?} failed: {err}");
                return self.close_and_clear(doc, CloseReason::Error);
            }
        };
        self.remember(batch.cache_key, &batch.items);
        if batch.items.is_empty() {
            return self.close_and_clear(doc, CloseReason::NoMatches);
        }

        let suggestions = match pipeline::refine(self, query, batch.items) {
            Ok(suggestions) => suggestions,
            Err(TypeaheadError::Behaviour(err)) => {
                log::debug!(target: "typeahead.pipeline", "coercion for {query:?} failed: {err}");
                return self.close_and_clear(doc, CloseReason::Error);
            }
            Err(err) => return Err(err),
        };
        if suggestions.is_empty() {
            return self.close_and_clear(doc, CloseReason::NoMatches);
        }

        self.suggestions = suggestions;
        self.index = None;
        self.render(doc, query)?;
        if self.open {
            if self.options.auto_first {
                self.focus(doc, Some(0))?;
            }
            Ok(())
        } else {
            self.open(doc)
        }
    }

    fn render(&mut self, doc: &mut Document, query: &str) -> Result<(), TypeaheadError> {
        let container = self.require_container()?;
        let element = self.behaviours.element()?;
        doc.discard_children(container)?;
        for suggestion in &self.suggestions {
            let child = element(self, doc, suggestion, query)?;
            doc.append_child(container, child)?;
        }
        Ok(())
    }

    // --- state machine ---

    pub fn open(&mut self, doc: &mut Document) -> Result<(), TypeaheadError> {
        if self.open || self.suggestions.is_empty() {
            return Ok(());
        }
        let container = self.require_container()?;
        self.track(doc)?;
        doc.add_class(container, css::OPEN)?;
        self.open = true;
        if self.options.auto_first && self.index.is_none() {
            self.focus(doc, Some(0))?;
        }
        doc.dispatch_on(self.input, "opened", Value::Null);
        Ok(())
    }

    pub fn close(&mut self, doc: &mut Document) -> Result<(), TypeaheadError> {
        self.close_with(doc, CloseReason::Explicit)
    }

    /// Hides the dropdown and resets focus. Always cancels the current
    /// fetch; only dispatches `closed` when the dropdown was open.
    pub fn close_with(&mut self, doc: &mut Document, reason: CloseReason) -> Result<(), TypeaheadError> {
        self.cancel.cancel();
        if !self.open {
            return Ok(());
        }
        let container = self.require_container()?;
        doc.remove_class(container, css::OPEN)?;
        self.clear_focus_class(doc)?;
        self.open = false;
        self.index = None;
        doc.dispatch_on(self.input, "closed", json!({ "reason": reason.as_str() }));
        Ok(())
    }

    fn close_and_clear(&mut self, doc: &mut Document, reason: CloseReason) -> Result<(), TypeaheadError> {
        self.close_with(doc, reason)?;
        self.suggestions.clear();
        self.index = None;
        if let Some(container) = self.container {
            doc.discard_children(container)?;
        }
        Ok(())
    }

    /// Clears the host input through the `input` behaviour.
    pub fn clear(&mut self, doc: &mut Document) -> Result<(), TypeaheadError> {
        let input = self.behaviours.input()?;
        input(self, doc, None)?;
        Ok(())
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    fn clear_focus_class(&self, doc: &mut Document) -> Result<(), TypeaheadError> {
        let container = self.require_container()?;
        let selector = format!(".{}", css::FOCUSED);
        for element in doc.many(&selector, Some(container))? {
            doc.remove_class(element, css::FOCUSED)?;
        }
        Ok(())
    }

    /// Moves focus; out-of-range indices clear it.
    pub fn focus(&mut self, doc: &mut Document, index: Option<usize>) -> Result<(), TypeaheadError> {
        let container = self.require_container()?;
        self.clear_focus_class(doc)?;
        self.index = index.filter(|i| *i < self.suggestions.len());
        let Some(i) = self.index else {
            return Ok(());
        };
        if let Some(element) = doc.element_children(container).get(i).copied() {
            doc.add_class(element, css::FOCUSED)?;
        }
        let detail = json!({ "suggestion": self.suggestions[i].to_json() });
        doc.dispatch(Event::new("focus", self.input).with_detail(detail).non_cancelable());
        Ok(())
    }

    /// Focuses the next suggestion, wrapping from the last to the first.
    pub fn next(&mut self, doc: &mut Document) -> Result<(), TypeaheadError> {
        let count = self.suggestions.len();
        if count == 0 {
            return Ok(());
        }
        let next = match self.index {
            Some(i) if i + 1 < count => i + 1,
            _ => 0,
        };
        self.focus(doc, Some(next))
    }

    /// Focuses the previous suggestion, wrapping from the first to the last.
    pub fn previous(&mut self, doc: &mut Document) -> Result<(), TypeaheadError> {
        let count = self.suggestions.len();
        if count == 0 {
            return Ok(());
        }
        let previous = match self.index {
            Some(i) if i > 0 => i - 1,
            _ => count - 1,
        };
        self.focus(doc, Some(previous))
    }

    /// Selects the suggestion at `index` (or the focused one). A `select`
    /// listener may veto; otherwise the `input` behaviour writes the
    /// suggestion, the dropdown closes and `selected` is dispatched.
    pub fn select(
        &mut self,
        doc: &mut Document,
        index: Option<usize>,
    ) -> Result<SelectOutcome, TypeaheadError> {
        if let Some(i) = index {
            if Some(i) != self.index {
                self.focus(doc, Some(i))?;
            }
        }
        let Some(suggestion) = self.focused().cloned() else {
            return Ok(SelectOutcome::NothingFocused);
        };

        let detail = json!({ "suggestion": suggestion.to_json() });
        if !doc.dispatch(Event::new("select", self.input).with_detail(detail.clone())) {
            log::trace!(target: "typeahead", "selection of {:?} vetoed", suggestion.value);
            return Ok(SelectOutcome::Vetoed);
        }

        let input = self.behaviours.input()?;
        input(self, doc, Some(&suggestion))?;
        self.close_with(doc, CloseReason::Select)?;
        doc.dispatch(Event::new("selected", self.input).with_detail(detail).non_cancelable());
        Ok(SelectOutcome::Selected(suggestion))
    }

    /// Positions the container under the input, in page coordinates.
    fn track(&self, doc: &mut Document) -> Result<(), TypeaheadError> {
        let container = self.require_container()?;
        let rect = doc.bounding_rect(self.input);
        let (scroll_x, scroll_y) = doc.scroll_offset();
        let top = rect.top() + scroll_y + rect.height;
        let left = rect.left() + scroll_x;
        doc.set_style(container, "top", &format!("{top}px"))?;
        doc.set_style(container, "left", &format!("{left}px"))?;
        doc.set_style(container, "width", &format!("{}px", rect.width))?;
        Ok(())
    }

    // --- host events ---

    /// Keyboard navigation. Returns whether the key's default action should be
    /// prevented.
    pub fn on_keydown(&mut self, doc: &mut Document, key: KeyCode) -> Result<bool, TypeaheadError> {
        if !self.open {
            return Ok(false);
        }
        match key {
            KeyCode::Tab => {
                if self.options.must_match {
                    self.select(doc, None)?;
                }
                Ok(false)
            }
            KeyCode::Enter => {
                if self.index.is_some() {
                    self.select(doc, None)?;
                    Ok(true)
                } else {
                    self.close(doc)?;
                    Ok(false)
                }
            }
            KeyCode::Escape => {
                self.close_with(doc, CloseReason::Escape)?;
                Ok(false)
            }
            KeyCode::ArrowUp => {
                self.previous(doc)?;
                Ok(true)
            }
            KeyCode::ArrowDown => {
                self.next(doc)?;
                Ok(true)
            }
            KeyCode::Other(_) => Ok(false),
        }
    }

    /// Pointer press or touch start inside the container. Selects the
    /// suggestion whose element contains `target`. Returns whether the press
    /// was consumed.
    pub fn on_pointer_down(
        &mut self,
        doc: &mut Document,
        target: Id,
        button: PointerButton,
    ) -> Result<Option<SelectOutcome>, TypeaheadError> {
        let Some(container) = self.container else {
            return Ok(None);
        };
        if !self.open {
            return Ok(None);
        }
        if target == container || !button.is_primary() || !doc.contains(container, target) {
            return Ok(None);
        }
        let mut element = target;
        while let Some(parent) = doc.parent(element) {
            if parent == container {
                break;
            }
            element = parent;
        }
        let Some(index) = doc
            .element_children(container)
            .iter()
            .position(|child| *child == element)
        else {
            return Ok(None);
        };
        self.select(doc, Some(index)).map(Some)
    }

    pub fn on_blur(&mut self, doc: &mut Document) -> Result<(), TypeaheadError> {
        self.close_with(doc, CloseReason::Blur)
    }

    /// Window resize, orientation or fullscreen change.
    pub fn on_window_change(&mut self, doc: &mut Document) -> Result<(), TypeaheadError> {
        self.close_with(doc, CloseReason::Resize)
    }
}
