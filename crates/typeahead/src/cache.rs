use crate::suggestion::RawItem;
use std::collections::HashMap;

/// Raw fetched batches keyed by query prefix. Entries never expire; only
/// [`SuggestionCache::clear`] invalidates them.
#[derive(Debug, Default)]
pub struct SuggestionCache {
    entries: HashMap<String, Vec<RawItem>>,
}

impl SuggestionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&[RawItem]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn insert(&mut self, key: String, items: Vec<RawItem>) {
        self.entries.insert(key, items);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
