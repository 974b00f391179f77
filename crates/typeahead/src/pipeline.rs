//! Fetch plumbing and the coerce, filter, sort, truncate stages.
//!
//! Every `update` opens a new [`Generation`]. Results that come back for any
//! other generation are stale and never touch the suggestion list.

use crate::error::{FetchError, TypeaheadError};
use crate::options::TypeaheadOptions;
use crate::suggestion::{RawItem, Suggestion};
use crate::typeahead::Typeahead;
use core_types::Generation;
use dom::Document;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

/// Handed to every fetch. Cancelled when the generation is superseded, the
/// dropdown closes or the instance is destroyed.
#[derive(Clone, Debug)]
pub struct CancelToken {
    generation: Generation,
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new(generation: Generation) -> Self {
        Self {
            generation,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// The shared flag, for worker threads.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }
}

/// Raw items produced by one fetch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FetchBatch {
    pub items: Vec<RawItem>,
    /// When set, the pipeline stores `items` in the cache under this key.
    pub cache_key: Option<String>,
}

impl FetchBatch {
    pub fn new(items: Vec<RawItem>) -> Self {
        Self {
            items,
            cache_key: None,
        }
    }

    pub fn cached_under(mut self, key: String) -> Self {
        self.cache_key = Some(key);
        self
    }
}

pub type FetchResult = Result<FetchBatch, FetchError>;

/// A fetch that settles later, on another thread.
pub struct PendingFetch {
    rx: Receiver<FetchResult>,
}

impl PendingFetch {
    pub fn new(rx: Receiver<FetchResult>) -> Self {
        Self { rx }
    }

    /// A pending fetch settled by whoever holds the sender.
    pub fn channel() -> (Sender<FetchResult>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }

    pub(crate) fn try_settle(&self) -> Option<FetchResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(FetchError::Disconnected)),
        }
    }

    pub(crate) fn wait(&self, timeout: Duration) -> Option<FetchResult> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(FetchError::Disconnected)),
        }
    }
}

pub enum FetchReply {
    Ready(FetchResult),
    Pending(PendingFetch),
}

impl FetchReply {
    pub fn items(items: Vec<RawItem>) -> Self {
        FetchReply::Ready(Ok(FetchBatch::new(items)))
    }

    pub fn failed(err: FetchError) -> Self {
        FetchReply::Ready(Err(err))
    }
}

/// What a fetch behaviour may look at.
pub struct FetchContext<'a> {
    pub typeahead: &'a Typeahead,
    pub doc: &'a Document,
}

impl FetchContext<'_> {
    pub fn options(&self) -> &TypeaheadOptions {
        self.typeahead.options()
    }
}

pub(crate) struct InFlight {
    pub(crate) generation: Generation,
    pub(crate) query: String,
    pub(crate) fetch: PendingFetch,
}

/// Coerces, filters, stably sorts and truncates a raw batch for `query`.
pub(crate) fn refine(
    typeahead: &Typeahead,
    query: &str,
    items: Vec<RawItem>,
) -> Result<Vec<Suggestion>, TypeaheadError> {
    let coerce = typeahead.behaviours().coerce()?;
    let filter = typeahead.behaviours().filter()?;
    let sort = typeahead.behaviours().sort()?;

    let mut suggestions = Vec::with_capacity(items.len());
    for item in items {
        let suggestion = coerce(typeahead, item)?;
        if filter(typeahead, &suggestion, query) {
            suggestions.push(suggestion);
        }
    }
    suggestions.sort_by(|a, b| sort(typeahead, query, a, b));
    suggestions.truncate(typeahead.options().max_items);
    Ok(suggestions)
}
