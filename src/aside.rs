//! Cache-Aside Orchestration
//!
//! Per-endpoint read path: derive key, check the cache, on miss query the
//! data source and populate the cache. Write paths invalidate the namespaces
//! whose cached reads they make stale.
//!
//! Two concurrent misses on one key may both reach the data source; the
//! later `set` wins. There is no single-flight deduplication.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{Cache, CacheKey};
use crate::error::FetchError;

// == Data Source ==
/// Backing store queried on a cache miss.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Parameters identifying one read; they are also what the key is derived from
    type Params: Serialize + Send + Sync;
    /// Rows returned for a read, stored in the cache as JSON
    type Rows: Serialize + DeserializeOwned + Send;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Runs the read. `Ok(None)` means the source has no data for `params`.
    async fn query(&self, params: &Self::Params) -> Result<Option<Self::Rows>, Self::Error>;
}

// == Cache Aside ==
/// Binds one logical read operation to its cache namespace.
#[derive(Debug)]
pub struct CacheAside<D> {
    cache: Cache,
    source: D,
    namespace: String,
    ttl: Option<u64>,
}

impl<D: DataSource> CacheAside<D> {
    pub fn new(cache: Cache, source: D, namespace: impl Into<String>) -> Self {
        Self {
            cache,
            source,
            namespace: namespace.into(),
            ttl: None,
        }
    }

    /// Stores results of this read for `ttl` seconds instead of the default.
    pub fn with_ttl(mut self, ttl: u64) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn source(&self) -> &D {
        &self.source
    }

    pub fn key_for(&self, params: &D::Params) -> Option<CacheKey> {
        self.cache.derive_key(&self.namespace, params)
    }

    // == Read ==
    /// Cached read.
    pub async fn read(&self, params: &D::Params) -> Result<D::Rows, FetchError<D::Error>> {
        self.read_with(params, true).await
    }

    /// Read with a per-request switch. With `use_cache` false the cache is
    /// neither consulted nor populated.
    ///
    /// Not-found and source failures are never cached, and a failure leaves
    /// no entry behind for the key.
    pub async fn read_with(
        &self,
        params: &D::Params,
        use_cache: bool,
    ) -> Result<D::Rows, FetchError<D::Error>> {
        let key = if use_cache && self.cache.is_enabled() {
            self.key_for(params)
        } else {
            None
        };

        if let Some(key) = &key {
            if let Some(rows) = self.cache.get_as::<D::Rows>(key.as_str()) {
                debug!("Cache hit for {}", key);
                return Ok(rows);
            }
        }

        // The lock is not held here; the query may suspend freely
        let rows = match self.source.query(params).await {
            Ok(Some(rows)) => rows,
            Ok(None) => {
                debug!("No data for {} read, not caching", self.namespace);
                return Err(FetchError::NotFound);
            }
            Err(err) => return Err(FetchError::Source(err)),
        };

        if let Some(key) = &key {
            if self.cache.set_value(key.as_str(), &rows, self.ttl) {
                debug!("Cached result for {}", key);
            }
        }

        Ok(rows)
    }

    /// Drops the cached result for one parameter set.
    pub fn forget(&self, params: &D::Params) -> bool {
        match self.key_for(params) {
            Some(key) => self.cache.delete(key.as_str()),
            None => false,
        }
    }

    /// Drops every cached result of this read.
    pub fn invalidate_all(&self) -> usize {
        self.cache.invalidate_pattern(&format!("{}:*", self.namespace))
    }
}

// == Forget Target ==
/// Type-erased single-entry invalidation for the admin routes, which only
/// see a path segment such as a folder name.
pub trait ForgetTarget: Send + Sync {
    /// Drops the cached read named by `name`, reporting whether one existed.
    fn forget(&self, name: &str) -> bool;
}

/// Forgets one read of `aside`, building its parameters from a name.
pub struct ForgetByName<D, F> {
    aside: Arc<CacheAside<D>>,
    to_params: F,
}

impl<D, F> ForgetByName<D, F> {
    pub fn new(aside: Arc<CacheAside<D>>, to_params: F) -> Self {
        Self { aside, to_params }
    }
}

impl<D, F> ForgetTarget for ForgetByName<D, F>
where
    D: DataSource,
    F: Fn(&str) -> D::Params + Send + Sync,
{
    fn forget(&self, name: &str) -> bool {
        let forgotten = self.aside.forget(&(self.to_params)(name));
        info!(
            "Cache clear for {} '{}': {}",
            self.aside.namespace(),
            name,
            if forgotten { "removed" } else { "not cached" }
        );
        forgotten
    }
}

// == Write Invalidation ==
/// Runs `write` and, once it has succeeded, invalidates each pattern.
///
/// The write's result is returned untouched. Invalidation never fails the
/// write; a pattern that removed nothing is logged since it may hide a
/// stale entry for up to one TTL.
pub async fn invalidate_after_write<F, T, E>(cache: &Cache, patterns: &[&str], write: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    let outcome = write.await?;

    if !cache.is_enabled() {
        return Ok(outcome);
    }

    let mut total = 0;
    for pattern in patterns {
        let removed = cache.invalidate_pattern(pattern);
        if removed == 0 {
            warn!("Invalidation after write removed nothing for pattern: {}", pattern);
        }
        total += removed;
    }
    info!("Write committed, invalidated {} cache entries", total);

    Ok(outcome)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, thiserror::Error)]
    #[error("connection reset")]
    struct Reset;

    /// Returns `[{"id": 1}]` for folder "X", nothing for anything else, and
    /// fails for folder "boom".
    #[derive(Default)]
    struct Folders {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl DataSource for Folders {
        type Params = Value;
        type Rows = Vec<Value>;
        type Error = Reset;

        async fn query(&self, params: &Value) -> Result<Option<Vec<Value>>, Reset> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match params["folder_name"].as_str() {
                Some("X") => Ok(Some(vec![json!({"id": 1})])),
                Some("boom") => Err(Reset),
                _ => Ok(None),
            }
        }
    }

    fn aside(config: CacheConfig) -> (CacheAside<Folders>, Arc<AtomicUsize>) {
        let source = Folders::default();
        let calls = Arc::clone(&source.calls);
        (
            CacheAside::new(Cache::init(config), source, "images_by_folder"),
            calls,
        )
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let (aside, calls) = aside(CacheConfig::default());
        let params = json!({"folder_name": "X"});

        assert_eq!(aside.read(&params).await.unwrap(), vec![json!({"id": 1})]);
        assert_eq!(aside.read(&params).await.unwrap(), vec![json!({"id": 1})]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let (aside, calls) = aside(CacheConfig::default());
        let params = json!({"folder_name": "empty"});

        assert!(aside.read(&params).await.unwrap_err().is_not_found());
        assert!(aside.read(&params).await.unwrap_err().is_not_found());

        let key = aside.key_for(&params).unwrap();
        assert_eq!(aside.cache().get(key.as_str()), None);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let (aside, _) = aside(CacheConfig::default());
        let params = json!({"folder_name": "boom"});

        let err = aside.read(&params).await.unwrap_err();
        assert!(matches!(err, FetchError::Source(Reset)));
        assert_eq!(aside.cache().stats().entry_count, 0);
    }

    #[tokio::test]
    async fn test_bypass_neither_reads_nor_writes() {
        let (aside, calls) = aside(CacheConfig::default());
        let params = json!({"folder_name": "X"});

        aside.read_with(&params, false).await.unwrap();
        assert_eq!(aside.cache().stats().entry_count, 0);

        aside.read(&params).await.unwrap();
        aside.read_with(&params, false).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_disabled_cache_always_queries() {
        let (aside, calls) = aside(CacheConfig::disabled());
        let params = json!({"folder_name": "X"});

        aside.read(&params).await.unwrap();
        aside.read(&params).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_custom_ttl_expires() {
        let (aside, calls) = aside(CacheConfig::default());
        let aside = aside.with_ttl(1);
        let params = json!({"folder_name": "X"});

        aside.read(&params).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        aside.read(&params).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_forget_and_invalidate_all() {
        let (aside, calls) = aside(CacheConfig::default());
        let params = json!({"folder_name": "X"});

        aside.read(&params).await.unwrap();
        assert!(aside.forget(&params));
        assert!(!aside.forget(&params));

        aside.read(&params).await.unwrap();
        aside.cache().set("folders_list", json!(["X"]), None);
        assert_eq!(aside.invalidate_all(), 1);
        assert_eq!(aside.cache().keys(), vec!["folders_list".to_string()]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_forget_by_name_touches_one_key() {
        let (aside, _) = aside(CacheConfig::default());
        let aside = Arc::new(aside);
        let target: Arc<dyn ForgetTarget> = Arc::new(ForgetByName::new(
            Arc::clone(&aside),
            |name: &str| json!({"folder_name": name}),
        ));

        aside.read(&json!({"folder_name": "X"})).await.unwrap();
        aside.cache().set("presentacion_by_id:a1b2", json!({}), None);

        // A short name must not behave like a substring pattern
        assert!(!target.forget("a"));
        assert_eq!(aside.cache().stats().entry_count, 2);

        assert!(target.forget("X"));
        assert_eq!(aside.cache().keys(), vec!["presentacion_by_id:a1b2".to_string()]);
    }

    #[tokio::test]
    async fn test_invalidate_after_successful_write() {
        let cache = Cache::init(CacheConfig::default());
        cache.set("presentaciones_all:aaa", json!([]), None);
        cache.set("presentacion_by_id:bbb", json!({}), None);
        cache.set("folders_list", json!([]), None);

        let written: Result<u32, Reset> = invalidate_after_write(
            &cache,
            &["presentaciones_all*", "presentacion_by_id:bbb"],
            async { Ok(7) },
        )
        .await;

        assert_eq!(written.unwrap(), 7);
        assert_eq!(cache.keys(), vec!["folders_list".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_cache() {
        let cache = Cache::init(CacheConfig::default());
        cache.set("presentaciones_all:aaa", json!([]), None);

        let written: Result<u32, Reset> =
            invalidate_after_write(&cache, &["presentaciones_all*"], async { Err(Reset) }).await;

        assert!(written.is_err());
        assert!(cache.get("presentaciones_all:aaa").is_some());
    }
}
