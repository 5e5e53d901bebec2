//! Cache Module
//!
//! In-memory caching with TTL expiration, LRU eviction, deterministic key
//! derivation and pattern invalidation.

mod entry;
mod facade;
mod key;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, MAX_TTL_SECONDS};
pub use facade::Cache;
pub use key::{derive_key, derive_key_from_value, CacheKey, DIGEST_HEX_LEN};
pub use lru::LruTracker;
pub use stats::{CacheStats, CacheStatsSnapshot};
pub use store::EntryStore;
