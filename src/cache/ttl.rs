//! In-memory cache with a single time-to-live
//!
//! Entries are stamped with the instant they were stored. Freshness is checked on
//! every read; nothing expires in the background and stale entries stay in the map
//! until they are overwritten or invalidated.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A stored value together with the instant it was fetched
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh_at(&self, now: Instant, timeout: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < timeout
    }
}

/// Keyed cache that serves a value only while it is younger than `timeout`
///
/// The cache never refetches on its own: a miss (absent or stale) is reported as
/// `None` and the caller decides what to do about it.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    timeout: Duration,
}

impl<V> TtlCache<V> {
    /// Creates an empty cache whose entries stay fresh for `timeout`
    pub fn new(timeout: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            timeout,
        }
    }

    /// The freshness window applied to every entry
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the cached value if it exists and is still fresh
    pub fn get(&self, key: &str) -> Option<&V> {
        self.get_at(key, Instant::now())
    }

    pub(crate) fn get_at(&self, key: &str, now: Instant) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh_at(now, self.timeout))
            .map(|entry| &entry.value)
    }

    /// Stores `value` stamped with the current instant, replacing any prior entry
    pub fn put(&mut self, key: impl Into<String>, value: V) {
        self.put_at(key, value, Instant::now());
    }

    pub(crate) fn put_at(&mut self, key: impl Into<String>, value: V, fetched_at: Instant) {
        self.entries
            .insert(key.into(), CacheEntry { value, fetched_at });
    }

    /// Removes one entry, or every entry when `key` is `None`
    pub fn invalidate(&mut self, key: Option<&str>) {
        match key {
            Some(key) => {
                self.entries.remove(key);
            }
            None => self.entries.clear(),
        }
    }

    /// When the entry for `key` was stored, fresh or not
    pub fn fetched_at(&self, key: &str) -> Option<Instant> {
        self.entries.get(key).map(|entry| entry.fetched_at)
    }

    /// Number of stored entries, including stale ones
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
