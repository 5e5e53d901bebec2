//! API Handlers
//!
//! HTTP request handlers for the cache admin endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use crate::aside::ForgetTarget;
use crate::cache::{Cache, CacheStatsSnapshot};
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, DeleteResponse, ForgetResponse, HealthResponse, WarmUpQuery, WarmUpResponse,
};
use crate::warmup::WarmUpTarget;

/// Application state shared across all handlers.
///
/// Holds a handle to the shared cache and, optionally, the per-name forget
/// and the listing-driven warm-up the host wires in.
#[derive(Clone)]
pub struct AppState {
    pub cache: Cache,
    pub forget: Option<Arc<dyn ForgetTarget>>,
    pub warm_up: Option<Arc<dyn WarmUpTarget>>,
}

impl AppState {
    pub fn new(cache: Cache) -> Self {
        Self {
            cache,
            forget: None,
            warm_up: None,
        }
    }

    /// Enables DELETE /cache/clear/:name against `target`.
    pub fn with_forget(mut self, target: Arc<dyn ForgetTarget>) -> Self {
        self.forget = Some(target);
        self
    }

    /// Enables POST /cache/warm-up against `target`.
    pub fn with_warm_up(mut self, target: Arc<dyn WarmUpTarget>) -> Self {
        self.warm_up = Some(target);
        self
    }
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStatsSnapshot> {
    Json(state.cache.stats())
}

/// Handler for DELETE /cache/clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let deleted = state.cache.invalidate_pattern("*");
    Json(ClearResponse::new("*", deleted))
}

/// Handler for DELETE /cache/clear/:name
///
/// Drops the single cached read derived from `name`; other keys are untouched.
pub async fn clear_name_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ForgetResponse>> {
    let target = state
        .forget
        .as_ref()
        .ok_or_else(|| CacheError::Unavailable("Per-name clear is not configured".to_string()))?;

    let success = target.forget(&name);
    Ok(Json(ForgetResponse::new(&name, success)))
}

/// Handler for DELETE /cache/invalidate/:pattern
pub async fn invalidate_pattern_handler(
    State(state): State<AppState>,
    Path(pattern): Path<String>,
) -> Result<Json<ClearResponse>> {
    if pattern.trim().is_empty() {
        return Err(CacheError::InvalidRequest("Pattern cannot be empty".to_string()));
    }

    let deleted = state.cache.invalidate_pattern(&pattern);
    Ok(Json(ClearResponse::new(&pattern, deleted)))
}

/// Handler for DELETE /cache/key/:key
pub async fn delete_key_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if state.cache.delete(&key) {
        Ok(Json(DeleteResponse::new(key)))
    } else {
        Err(CacheError::NotFound(key))
    }
}

/// Handler for POST /cache/warm-up
///
/// Takes no body; `?limit=` caps how many listed items are read.
pub async fn warm_up_handler(
    State(state): State<AppState>,
    Query(query): Query<WarmUpQuery>,
) -> Result<Json<WarmUpResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let target = state
        .warm_up
        .as_ref()
        .ok_or_else(|| CacheError::Unavailable("Warm-up is not configured".to_string()))?;

    let report = target.warm_up(query.limit()).await?;
    info!(
        "Warm-up request completed: {}/{} warmed",
        report.warmed, report.attempted
    );

    Ok(Json(report.into()))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.is_enabled()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use serde_json::json;

    fn state() -> AppState {
        AppState::new(Cache::init(CacheConfig::default()))
    }

    /// Forgets `folder:<name>` keys only.
    struct ExactKey(Cache);

    impl ForgetTarget for ExactKey {
        fn forget(&self, name: &str) -> bool {
            self.0.delete(&format!("folder:{}", name))
        }
    }

    #[tokio::test]
    async fn test_clear_handlers() {
        let state = state();
        state.cache.set("presentaciones_all:1", json!(1), None);
        state.cache.set("folders_list", json!(2), None);

        let response =
            invalidate_pattern_handler(State(state.clone()), Path("presentaciones*".to_string()))
                .await
                .unwrap();
        assert_eq!(response.deleted, 1);

        let response = clear_handler(State(state.clone())).await;
        assert_eq!(response.deleted, 1);
        assert_eq!(state.cache.stats().size, 0);
    }

    #[tokio::test]
    async fn test_invalidate_blank_pattern_rejected() {
        let result = invalidate_pattern_handler(State(state()), Path("  ".to_string())).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_clear_name_handler() {
        let base = state();
        let state = base.clone().with_forget(Arc::new(ExactKey(base.cache.clone())));
        state.cache.set("folder:a", json!([]), None);
        state.cache.set("folder:ab", json!([]), None);

        let response = clear_name_handler(State(state.clone()), Path("a".to_string()))
            .await
            .unwrap();
        assert!(response.success);
        assert_eq!(state.cache.keys(), vec!["folder:ab".to_string()]);

        let response = clear_name_handler(State(state), Path("a".to_string()))
            .await
            .unwrap();
        assert!(!response.success);
    }

    #[tokio::test]
    async fn test_clear_name_without_target() {
        let result = clear_name_handler(State(state()), Path("a".to_string())).await;
        assert!(matches!(result, Err(CacheError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_delete_key_handler() {
        let state = state();
        state.cache.set("folders_list", json!([]), None);

        let result = delete_key_handler(State(state.clone()), Path("folders_list".to_string())).await;
        assert!(result.is_ok());

        let result = delete_key_handler(State(state), Path("folders_list".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_warm_up_without_target() {
        let result = warm_up_handler(State(state()), Query(WarmUpQuery::default())).await;
        assert!(matches!(result, Err(CacheError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_warm_up_zero_limit_rejected() {
        let query = WarmUpQuery { limit: Some(0) };
        let result = warm_up_handler(State(state()), Query(query)).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_stats_and_health_handlers() {
        let state = state();

        let stats = stats_handler(State(state.clone())).await;
        assert!(stats.enabled);
        assert_eq!(stats.capacity, 1000);

        let health = health_handler(State(state)).await;
        assert_eq!(health.status, "healthy");
        assert!(health.cache_enabled);
    }
}
