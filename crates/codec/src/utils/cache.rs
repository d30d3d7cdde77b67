//! Segmentation cache for repeated words.
//!
//! Natural text repeats a small set of words very often, so caching the
//! rendered tokens of each word avoids replaying the rule table for them.

use ahash::AHashMap;
use std::collections::BTreeMap;

/// LRU cache from a word to its rendered tokens.
///
/// Recency is tracked with a monotonically increasing tick; the ordered
/// tick map gives the least recently used entry in logarithmic time.
pub struct SegmentCache {
    /// word -> (tokens, last use tick)
    entries: AHashMap<String, (Vec<String>, u64)>,
    /// last use tick -> word
    recency: BTreeMap<u64, String>,
    /// Maximum number of entries in the cache
    capacity: usize,
    tick: u64,
    hits: u64,
    misses: u64,
}

impl SegmentCache {
    /// Create a cache holding at most `capacity` words.
    ///
    /// A capacity of zero disables caching.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: AHashMap::with_capacity(capacity),
            recency: BTreeMap::new(),
            capacity,
            tick: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Create a cache with the default capacity (10 000 words).
    pub fn new() -> Self {
        Self::with_capacity(10_000)
    }

    /// Get the cached tokens for `word`, computing them on a miss.
    pub fn get_or_insert_with<F>(&mut self, word: &str, segment: F) -> Vec<String>
    where
        F: FnOnce(&str) -> Vec<String>,
    {
        self.tick += 1;
        let tick = self.tick;

        if let Some((tokens, last_used)) = self.entries.get_mut(word) {
            self.recency.remove(last_used);
            *last_used = tick;
            self.recency.insert(tick, word.to_string());
            self.hits += 1;
            return tokens.clone();
        }

        self.misses += 1;
        let tokens = segment(word);
        if self.capacity == 0 {
            return tokens;
        }

        if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.entries
            .insert(word.to_string(), (tokens.clone(), tick));
        self.recency.insert(tick, word.to_string());

        tokens
    }

    fn evict_oldest(&mut self) {
        if let Some((_, word)) = self.recency.pop_first() {
            self.entries.remove(&word);
        }
    }

    /// Whether `word` is cached. Does not count as a use.
    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    /// Clear all entries and statistics.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Get the number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the cache capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Resize the cache.
    ///
    /// If the new capacity is smaller than the current size,
    /// least recently used entries are evicted.
    pub fn resize(&mut self, new_capacity: usize) {
        self.capacity = new_capacity;
        while self.entries.len() > new_capacity {
            self.evict_oldest();
        }
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let lookups = self.hits + self.misses;
        CacheStats {
            entries: self.entries.len(),
            capacity: self.capacity,
            hits: self.hits,
            misses: self.misses,
            hit_rate: if lookups == 0 {
                None
            } else {
                Some(self.hits as f64 / lookups as f64)
            },
        }
    }
}

impl Default for SegmentCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Current number of entries
    pub entries: usize,
    /// Maximum capacity
    pub capacity: usize,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to segment
    pub misses: u64,
    /// Cache hit rate (None before the first lookup)
    pub hit_rate: Option<f64>,
}
