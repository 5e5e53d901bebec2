//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

use serde_json::Value;

/// Longest lifetime an entry can be given; larger TTLs are clamped to it.
pub const MAX_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

// == Cache Entry ==
/// A stored payload and its absolute expiry.
///
/// Owned by the store; a write replaces the entry wholesale.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// When the entry was written
    pub created_at: Instant,
    /// When the entry stops being served
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry that lives for `ttl`, at most `MAX_TTL_SECONDS`.
    pub fn new(value: Value, ttl: Duration) -> Self {
        let now = Instant::now();
        let ttl = ttl.min(Duration::from_secs(MAX_TTL_SECONDS));
        // Instant + Duration panics on overflow; an unrepresentable expiry
        // degrades to an entry that is dropped on first read
        let expires_at = now.checked_add(ttl).unwrap_or(now);

        Self {
            value,
            created_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches `expires_at`, so a
    /// fully elapsed TTL is never served.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against a caller-supplied clock
    /// reading, so scans over many entries use one consistent instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}
