//! Per-controller content cache.
//!
//! Keys identify deferred content sources. An entry is either the resolved
//! content or a marker saying a fetch for the key is outstanding. Resolved
//! entries are never evicted; a later result for the same key overwrites the
//! earlier one.

use std::collections::HashMap;

/// State of one cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    /// A fetch was issued and has not answered yet.
    InFlight,
    /// Resolved content.
    Ready(String),
}

/// Content cache owned by a single controller.
#[derive(Debug, Default)]
pub struct ContentCache {
    entries: HashMap<String, CacheEntry>,
}

impl ContentCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Returns the resolved content for a key.
    #[must_use]
    pub fn ready(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(CacheEntry::Ready(content)) => Some(content),
            _ => None,
        }
    }

    /// Returns true if a fetch for the key is outstanding.
    #[must_use]
    pub fn is_in_flight(&self, key: &str) -> bool {
        matches!(self.entries.get(key), Some(CacheEntry::InFlight))
    }

    /// Marks a fetch for the key as outstanding.
    ///
    /// Returns false, leaving the cache untouched, if the key already has an
    /// entry of either kind.
    pub fn begin(&mut self, key: &str) -> bool {
        if self.entries.contains_key(key) {
            return false;
        }
        self.entries.insert(key.to_string(), CacheEntry::InFlight);
        true
    }

    /// Stores resolved content.
    pub fn store(&mut self, key: &str, content: String) {
        self.entries.insert(key.to_string(), CacheEntry::Ready(content));
    }

    /// Drops the in-flight marker after a failed fetch so the key can be
    /// requested again. Resolved entries are kept.
    pub fn abandon(&mut self, key: &str) {
        if self.is_in_flight(key) {
            self.entries.remove(key);
        }
    }

    /// Number of entries, in flight or resolved.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_once_per_key() {
        let mut cache = ContentCache::new();

        assert!(cache.begin("/help"));
        assert!(!cache.begin("/help"));
        assert!(cache.is_in_flight("/help"));
        assert!(cache.ready("/help").is_none());
    }

    #[test]
    fn test_store_replaces_marker() {
        let mut cache = ContentCache::new();
        cache.begin("/help");
        cache.store("/help", "Help text".to_string());

        assert_eq!(cache.ready("/help"), Some("Help text"));
        assert!(!cache.begin("/help"));

        cache.store("/help", "Newer".to_string());
        assert_eq!(cache.ready("/help"), Some("Newer"));
    }

    #[test]
    fn test_abandon_only_clears_marker() {
        let mut cache = ContentCache::new();
        cache.begin("/a");
        cache.store("/b", "kept".to_string());

        cache.abandon("/a");
        cache.abandon("/b");

        assert!(cache.get("/a").is_none());
        assert_eq!(cache.ready("/b"), Some("kept"));
        assert_eq!(cache.len(), 1);
    }
}
