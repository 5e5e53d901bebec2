//! Cache Facade Module
//!
//! Public get/set/delete/invalidate/stats operations used by request
//! handlers. Every operation funnels through one mutex around the entry
//! store; nothing here awaits or does I/O while holding it.
//!
//! The facade fails open: a value that cannot be (de)serialized is logged and
//! reported as a miss or `false`. A lock poisoned by a panicking holder is
//! recovered by dropping every entry, since the store may be half-updated.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::cache::{derive_key, CacheKey, CacheStatsSnapshot, EntryStore};
use crate::config::CacheConfig;

// == Cache ==
/// Shared handle to the process cache. Cloning is cheap and every clone sees
/// the same entries.
#[derive(Debug, Clone)]
pub struct Cache {
    config: Arc<CacheConfig>,
    store: Arc<Mutex<EntryStore>>,
}

impl Cache {
    // == Lifecycle ==
    /// Builds the cache from its startup configuration.
    pub fn init(config: CacheConfig) -> Self {
        let config = config.normalized();

        if config.enabled {
            info!(
                "Memory cache initialized: max_entries={}, default_ttl={}s",
                config.max_entries, config.default_ttl
            );
        } else {
            info!("Cache disabled in settings");
        }

        let store = EntryStore::new(config.max_entries, config.default_ttl);
        Self {
            config: Arc::new(config),
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Drops every entry at shutdown, returning how many were held.
    pub fn close(&self) -> usize {
        let cleared = self.clear();
        info!("Memory cache cleared on close: {} entries", cleared);
        cleared
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    // == Get ==
    /// Returns the cached value, or `None` on miss, expiry, disabled cache or
    /// store fault.
    pub fn get(&self, key: &str) -> Option<Value> {
        if !self.config.enabled {
            return None;
        }

        let value = self.with_store(|store| store.get(key));
        match &value {
            Some(_) => debug!("Cache hit: {}", key),
            None => debug!("Cache miss: {}", key),
        }
        value
    }

    /// Typed variant of [`get`](Self::get). A value that no longer matches `T`
    /// is logged and treated as a miss.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(err) => {
                warn!("Cache value for {} could not be decoded: {}", key, err);
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl` seconds (`None` = default TTL).
    ///
    /// Returns false only when caching is disabled.
    pub fn set(&self, key: &str, value: Value, ttl: Option<u64>) -> bool {
        if !self.config.enabled {
            return false;
        }

        self.with_store(|store| store.put(key.to_string(), value, ttl));
        debug!("Cache set: {}", key);
        true
    }

    /// Serializes `value` and stores it. Serialization failures return false.
    pub fn set_value<T>(&self, key: &str, value: &T, ttl: Option<u64>) -> bool
    where
        T: Serialize + ?Sized,
    {
        if !self.config.enabled {
            return false;
        }

        match serde_json::to_value(value) {
            Ok(value) => self.set(key, value, ttl),
            Err(err) => {
                error!("Cache set error for {}: {}", key, err);
                false
            }
        }
    }

    // == Delete ==
    /// Removes one key, reporting whether it existed.
    pub fn delete(&self, key: &str) -> bool {
        if !self.config.enabled {
            return false;
        }

        let existed = self.with_store(|store| store.remove(key));
        if existed {
            debug!("Cache deleted: {}", key);
        }
        existed
    }

    // == Invalidate Pattern ==
    /// Removes every key matching `pattern` and returns the count.
    ///
    /// `"*"` matches everything. Any other pattern has its `*` characters
    /// stripped and matches keys containing the remainder anywhere, so
    /// `"presentaciones_all*"` removes `presentaciones_all:<digest>` keys.
    pub fn invalidate_pattern(&self, pattern: &str) -> usize {
        if !self.config.enabled {
            return 0;
        }

        let removed = if pattern == "*" {
            self.with_store(|store| store.clear())
        } else {
            let needle = pattern.replace('*', "");
            self.with_store(|store| store.remove_matching(|key| key.contains(needle.as_str())))
        };

        info!("Cleared {} cache entries matching pattern: {}", removed, pattern);
        removed
    }

    // == Clear ==
    /// Removes all entries regardless of the enabled switch.
    pub fn clear(&self) -> usize {
        self.with_store(|store| store.clear())
    }

    /// Reclaims expired entries ahead of lazy expiry.
    pub fn cleanup_expired(&self) -> usize {
        self.with_store(|store| store.cleanup_expired())
    }

    // == Stats ==
    /// Read-only snapshot; never mutates the store.
    pub fn stats(&self) -> CacheStatsSnapshot {
        let (size, entry_count, counters) = self.with_store(|store| {
            (store.live_len(), store.len(), store.stats().clone())
        });

        CacheStatsSnapshot {
            enabled: self.config.enabled,
            size,
            capacity: self.config.max_entries,
            ttl_default: self.config.default_ttl,
            entry_count,
            hits: counters.hits,
            misses: counters.misses,
            evictions: counters.evictions,
            expirations: counters.expirations,
            invalidations: counters.invalidations,
            hit_rate: counters.hit_rate(),
            cache_type: "memory_only",
        }
    }

    /// Stored keys, expired ones included until reclaimed.
    pub fn keys(&self) -> Vec<String> {
        self.with_store(|store| store.keys())
    }

    // == Key Derivation ==
    /// Derives the key for `params` under `namespace`, logging and returning
    /// `None` when the parameters cannot be canonicalized.
    pub fn derive_key<P>(&self, namespace: &str, params: &P) -> Option<CacheKey>
    where
        P: Serialize + ?Sized,
    {
        match derive_key(namespace, params) {
            Ok(key) => Some(key),
            Err(err) => {
                error!("Cache key derivation failed for {}: {}", namespace, err);
                None
            }
        }
    }

    fn with_store<R>(&self, f: impl FnOnce(&mut EntryStore) -> R) -> R {
        let mut store = self.lock_store();
        f(&mut *store)
    }

    /// Takes the store lock, recovering it if a previous holder panicked.
    ///
    /// The entries of a poisoned store are dropped; counters are kept.
    fn lock_store(&self) -> MutexGuard<'_, EntryStore> {
        match self.store.lock() {
            Ok(store) => store,
            Err(poisoned) => {
                let mut store = poisoned.into_inner();
                let dropped = store.clear();
                self.store.clear_poison();
                error!(
                    "Cache entry store lock poisoned, recovered by dropping {} entries",
                    dropped
                );
                store
            }
        }
    }
}
