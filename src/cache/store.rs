//! Entry Store Module
//!
//! Bounded key/value container combining HashMap storage with LRU tracking
//! and TTL expiration. The store is not synchronized itself; the facade owns
//! the single lock that guards it.

use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats, LruTracker, MAX_TTL_SECONDS};

// == Entry Store ==
/// Bounded key/value storage with expiry and eviction.
#[derive(Debug)]
pub struct EntryStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Keys ordered by expiry, soonest first; mirrors `entries`
    expiry: BTreeSet<(Instant, String)>,
    /// Running counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// TTL applied when `put` is given none
    default_ttl: Duration,
}

impl EntryStore {
    // == Constructor ==
    /// Creates a new store with the given capacity and default TTL.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries, clamped to at least 1
    /// * `default_ttl` - Default TTL in seconds for entries without explicit TTL
    pub fn new(max_entries: usize, default_ttl: u64) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            expiry: BTreeSet::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
            default_ttl: Duration::from_secs(default_ttl.min(MAX_TTL_SECONDS)),
        }
    }

    // == Put ==
    /// Inserts or overwrites a value.
    ///
    /// A `ttl` of `None` or `Some(0)` uses the default TTL; anything above
    /// `MAX_TTL_SECONDS` is clamped. Inserting a new key into a full store
    /// evicts one victim first. Never fails.
    pub fn put(&mut self, key: String, value: Value, ttl: Option<u64>) {
        let ttl = match ttl {
            Some(secs) if secs > 0 => Duration::from_secs(secs.min(MAX_TTL_SECONDS)),
            _ => self.default_ttl,
        };

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.evict_one();
        }

        if let Some(old) = self.entries.get(&key) {
            self.expiry.remove(&(old.expires_at, key.clone()));
        }

        let entry = CacheEntry::new(value, ttl);
        self.lru.touch(&key);
        self.expiry.insert((entry.expires_at, key.clone()));
        self.entries.insert(key, entry);
    }

    // == Get ==
    /// Returns the value if present and not expired.
    ///
    /// An expired entry is removed on the spot and counted as a miss.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.detach(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Remove ==
    /// Removes an entry, reporting whether it existed.
    pub fn remove(&mut self, key: &str) -> bool {
        if self.detach(key).is_some() {
            self.stats.record_invalidations(1);
            true
        } else {
            false
        }
    }

    // == Remove Matching ==
    /// Removes every entry whose key satisfies `predicate`.
    pub fn remove_matching<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&str) -> bool,
    {
        let doomed: Vec<String> = self
            .entries
            .keys()
            .filter(|key| predicate(key))
            .cloned()
            .collect();

        for key in &doomed {
            self.detach(key);
        }

        self.stats.record_invalidations(doomed.len());
        doomed.len()
    }

    // == Clear ==
    /// Removes all entries and returns how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        self.expiry.clear();
        self.stats.record_invalidations(count);
        count
    }

    // == Cleanup Expired ==
    /// Proactively removes all expired entries, returning the count.
    ///
    /// Walks the expiry index from the front, so only expired keys are visited.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        while let Some((_, key)) = self.pop_expired(now) {
            self.entries.remove(&key);
            self.lru.remove(&key);
            removed += 1;
        }

        self.stats.record_expirations(removed);
        removed
    }

    // == Eviction ==
    /// Drops one victim: the soonest-expired entry if any has expired,
    /// otherwise the least recently touched one.
    fn evict_one(&mut self) {
        if let Some((_, key)) = self.pop_expired(Instant::now()) {
            self.entries.remove(&key);
            self.lru.remove(&key);
            self.stats.record_expirations(1);
            return;
        }

        if let Some(key) = self.lru.evict_oldest() {
            if let Some(entry) = self.entries.remove(&key) {
                self.expiry.remove(&(entry.expires_at, key));
            }
            self.stats.record_eviction();
        }
    }

    /// Takes the soonest expiry off the index if it has passed at `now`.
    fn pop_expired(&mut self, now: Instant) -> Option<(Instant, String)> {
        let due = matches!(self.expiry.first(), Some((expires_at, _)) if *expires_at <= now);
        if due {
            self.expiry.pop_first()
        } else {
            None
        }
    }

    /// Unlinks `key` from the map, the LRU order and the expiry index.
    fn detach(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        self.expiry.remove(&(entry.expires_at, key.to_string()));
        Some(entry)
    }

    /// Current number of stored entries, expired ones included until reclaimed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of entries that are still servable.
    pub fn live_len(&self) -> usize {
        let now = Instant::now();
        let expired = self
            .expiry
            .iter()
            .take_while(|(expires_at, _)| *expires_at <= now)
            .count();
        self.entries.len().saturating_sub(expired)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Snapshot of stored keys, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}
