//! Bounded least-recently-used cache
//!
//! A hash map of entries plus a recency index keyed by a monotonically
//! increasing stamp. Every `get` or `insert` restamps the entry; inserting
//! into a full cache evicts the entry with the smallest stamp.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    stamp: u64,
}

/// Hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Entries dropped to make room
    pub evictions: u64,
}

/// LRU cache holding at most `capacity` entries
#[derive(Debug, Clone)]
pub struct LruCache<K, V> {
    capacity: usize,
    entries: HashMap<K, Entry<V>>,
    recency: BTreeMap<u64, K>,
    clock: u64,
    stats: CacheStats,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a cache. A capacity of zero stores nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            recency: BTreeMap::new(),
            clock: 0,
            stats: CacheStats::default(),
        }
    }

    /// Look up a key and mark it most recently used
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let Some(entry) = self.entries.get_mut(key) else {
            self.stats.misses += 1;
            return None;
        };

        self.clock += 1;
        self.recency.remove(&entry.stamp);
        entry.stamp = self.clock;
        self.recency.insert(self.clock, key.clone());
        self.stats.hits += 1;
        Some(&entry.value)
    }

    /// Insert or replace a value, returning the entry evicted to make room
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.capacity == 0 {
            return None;
        }

        self.clock += 1;
        if let Some(entry) = self.entries.get_mut(&key) {
            self.recency.remove(&entry.stamp);
            entry.stamp = self.clock;
            entry.value = value;
            self.recency.insert(self.clock, key);
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        self.recency.insert(self.clock, key.clone());
        self.entries.insert(
            key,
            Entry {
                value,
                stamp: self.clock,
            },
        );
        evicted
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Hit/miss/eviction counters
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop every entry; counters are kept
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    fn evict_oldest(&mut self) -> Option<(K, V)> {
        let (_, key) = self.recency.pop_first()?;
        let entry = self.entries.remove(&key)?;
        self.stats.evictions += 1;
        Some((key, entry.value))
    }
}
