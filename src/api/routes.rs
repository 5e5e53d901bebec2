//! API Routes
//!
//! Builds the cache admin router. The host service merges it into its own
//! application and owns the listener.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, clear_name_handler, delete_key_handler, health_handler,
    invalidate_pattern_handler, stats_handler, warm_up_handler, AppState,
};

/// Creates the admin router with all endpoints configured.
///
/// # Endpoints
/// - `GET /cache/stats` - Cache statistics snapshot
/// - `DELETE /cache/clear` - Drop every entry
/// - `DELETE /cache/clear/:name` - Drop the cached read derived from a name
/// - `DELETE /cache/invalidate/:pattern` - Drop entries matching a pattern
/// - `DELETE /cache/key/:key` - Drop one entry by its literal key
/// - `POST /cache/warm-up` - Preload from the cached listing, `?limit=` optional
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/cache/stats", get(stats_handler))
        .route("/cache/clear", delete(clear_handler))
        .route("/cache/clear/:name", delete(clear_name_handler))
        .route("/cache/invalidate/:pattern", delete(invalidate_pattern_handler))
        .route("/cache/key/:key", delete(delete_key_handler))
        .route("/cache/warm-up", post(warm_up_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
