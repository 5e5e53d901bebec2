//! Cache Statistics Module
//!
//! Tracks cache counters and the read-only snapshot handed to callers.

use serde::Serialize;

// == Cache Stats ==
/// Running counters kept by the entry store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups that returned a live value
    pub hits: u64,
    /// Lookups that found nothing or an expired entry
    pub misses: u64,
    /// Entries dropped to respect the capacity bound
    pub evictions: u64,
    /// Entries dropped because their TTL elapsed
    pub expirations: u64,
    /// Entries dropped by delete, pattern invalidation or clear
    pub invalidations: u64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns hits / (hits + misses), or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn record_invalidations(&mut self, count: usize) {
        self.invalidations += count as u64;
    }
}

// == Stats Snapshot ==
/// Point-in-time view returned by `Cache::stats`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CacheStatsSnapshot {
    pub enabled: bool,
    /// Live (non-expired) entries
    pub size: usize,
    /// Configured maximum number of entries
    pub capacity: usize,
    /// Default TTL in seconds
    pub ttl_default: u64,
    /// Physically stored entries, including expired ones not yet reclaimed
    pub entry_count: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub invalidations: u64,
    pub hit_rate: f64,
    pub cache_type: &'static str,
}
