//! Configuration Module
//!
//! Loads the process-wide cache configuration from environment variables.
//! The configuration is read once at startup and never mutated afterwards.

use std::env;

use crate::cache::MAX_TTL_SECONDS;

// == Defaults ==
const DEFAULT_ENABLED: bool = true;
const DEFAULT_MAX_ENTRIES: usize = 1000;
const DEFAULT_TTL_SECONDS: u64 = 300;
const DEFAULT_CLEANUP_INTERVAL: u64 = 0;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Master switch; when false every cache operation is a documented no-op
    pub enabled: bool,
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Default TTL in seconds for entries without explicit TTL
    pub default_ttl: u64,
    /// Background sweep interval in seconds, 0 disables the sweep
    pub cleanup_interval: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_ENABLED` - Enable caching (default: true)
    /// - `CACHE_TTL_SECONDS` - Default TTL in seconds (default: 300)
    /// - `MEMORY_CACHE_SIZE` - Maximum cache entries (default: 1000)
    /// - `CACHE_CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 0, off)
    pub fn from_env() -> Self {
        Self {
            enabled: env::var("CACHE_ENABLED")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(DEFAULT_ENABLED),
            max_entries: env::var("MEMORY_CACHE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_ENTRIES),
            default_ttl: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TTL_SECONDS),
            cleanup_interval: env::var("CACHE_CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CLEANUP_INTERVAL),
        }
        .normalized()
    }

    /// Same as the defaults, with caching switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Clamps values the store cannot honour: a zero capacity and TTLs past
    /// `MAX_TTL_SECONDS`.
    pub fn normalized(mut self) -> Self {
        if self.max_entries == 0 {
            self.max_entries = 1;
        }
        self.default_ttl = self.default_ttl.min(MAX_TTL_SECONDS);
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_ENABLED,
            max_entries: DEFAULT_MAX_ENTRIES,
            default_ttl: DEFAULT_TTL_SECONDS,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
