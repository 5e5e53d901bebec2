//! Warm-Up Driver
//!
//! Replays the cache-aside read path for a known working set so the first
//! real requests hit a populated cache.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aside::{CacheAside, DataSource};
use crate::error::{CacheError, FetchError, Result};

/// Candidates preloaded when the caller gives no limit.
pub const DEFAULT_WARM_UP_LIMIT: usize = 10;

// == Warm-Up Report ==
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WarmUpReport {
    /// Candidates whose read succeeded and was cached
    pub warmed: usize,
    /// Candidates read, not-found ones included
    pub attempted: usize,
}

// == Warm Up ==
/// Reads the first `limit` candidates through the cache.
///
/// Not-found candidates are skipped; the first source failure aborts the
/// remaining candidates and is returned unchanged. With caching disabled
/// nothing is read and an empty report is returned.
pub async fn warm_up<D, I>(
    aside: &CacheAside<D>,
    candidates: I,
    limit: usize,
) -> std::result::Result<WarmUpReport, D::Error>
where
    D: DataSource,
    I: IntoIterator<Item = D::Params>,
{
    let mut report = WarmUpReport::default();

    if !aside.cache().is_enabled() {
        info!("Cache disabled, skipping warm-up of {}", aside.namespace());
        return Ok(report);
    }

    for params in candidates.into_iter().take(limit) {
        report.attempted += 1;

        match aside.read(&params).await {
            Ok(_) => report.warmed += 1,
            Err(FetchError::NotFound) => {
                debug!("Warm-up candidate for {} has no data", aside.namespace());
            }
            Err(FetchError::Source(err)) => {
                warn!(
                    "Warm-up of {} aborted after {} candidates: {}",
                    aside.namespace(),
                    report.attempted,
                    err
                );
                return Err(err);
            }
        }
    }

    info!(
        "Cache warm-up completed for {}: {}/{} warmed",
        aside.namespace(),
        report.warmed,
        report.attempted
    );
    Ok(report)
}

/// Reads a listing through the cache, then warms the per-item read for the
/// first `limit` items of it.
///
/// An empty or missing listing warms nothing.
pub async fn warm_up_from_listing<L, D, F>(
    listing: &CacheAside<L>,
    listing_params: &L::Params,
    items: &CacheAside<D>,
    limit: usize,
    to_params: F,
) -> std::result::Result<WarmUpReport, D::Error>
where
    L: DataSource<Error = D::Error>,
    L::Rows: IntoIterator,
    D: DataSource,
    F: FnMut(<L::Rows as IntoIterator>::Item) -> D::Params,
{
    if !items.cache().is_enabled() {
        info!("Cache disabled, skipping warm-up of {}", items.namespace());
        return Ok(WarmUpReport::default());
    }

    let rows = match listing.read(listing_params).await {
        Ok(rows) => rows,
        Err(FetchError::NotFound) => return Ok(WarmUpReport::default()),
        Err(FetchError::Source(err)) => return Err(err),
    };

    let candidates: Vec<D::Params> = rows.into_iter().take(limit).map(to_params).collect();
    warm_up(items, candidates, limit).await
}

// == Warm-Up Target ==
/// Type-erased warm-up entry point for the admin routes.
#[async_trait]
pub trait WarmUpTarget: Send + Sync {
    /// Preloads up to `limit` reads, reporting what was warmed.
    async fn warm_up(&self, limit: usize) -> Result<WarmUpReport>;
}

/// Warms a per-item read from the items of a cached listing, the way the
/// admin route does it: list first, then read each of the first `limit`.
pub struct ListingWarmUp<L: DataSource, D, F> {
    listing: Arc<CacheAside<L>>,
    listing_params: L::Params,
    items: Arc<CacheAside<D>>,
    to_params: F,
}

impl<L: DataSource, D, F> ListingWarmUp<L, D, F> {
    pub fn new(
        listing: Arc<CacheAside<L>>,
        listing_params: L::Params,
        items: Arc<CacheAside<D>>,
        to_params: F,
    ) -> Self {
        Self {
            listing,
            listing_params,
            items,
            to_params,
        }
    }
}

#[async_trait]
impl<L, D, F> WarmUpTarget for ListingWarmUp<L, D, F>
where
    L: DataSource<Error = D::Error>,
    L::Rows: IntoIterator,
    D: DataSource,
    F: Fn(<L::Rows as IntoIterator>::Item) -> D::Params + Send + Sync,
{
    async fn warm_up(&self, limit: usize) -> Result<WarmUpReport> {
        warm_up_from_listing(
            &self.listing,
            &self.listing_params,
            &self.items,
            limit,
            &self.to_params,
        )
        .await
        .map_err(|err| CacheError::Source(err.to_string()))
    }
}
