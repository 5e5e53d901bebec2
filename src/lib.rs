//! Query Cache - in-process cache-aside layer
//!
//! Sits between request handlers and a backing data store: deterministic key
//! derivation, a bounded TTL/LRU entry store, pattern invalidation, and a
//! warm-up driver, plus admin routes a host service can mount.

pub mod api;
pub mod aside;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;
pub mod warmup;

pub use api::{create_router, AppState};
pub use aside::{invalidate_after_write, CacheAside, DataSource, ForgetByName, ForgetTarget};
pub use cache::{derive_key, Cache, CacheKey, CacheStatsSnapshot};
pub use config::CacheConfig;
pub use error::{CacheError, FetchError};
pub use tasks::spawn_cleanup_task;
pub use warmup::{warm_up, warm_up_from_listing, ListingWarmUp, WarmUpReport, WarmUpTarget};
