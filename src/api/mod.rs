//! API Module
//!
//! HTTP handlers and routing for the cache admin API.
//!
//! # Endpoints
//! - `GET /cache/stats` - Cache statistics
//! - `DELETE /cache/clear` - Clear everything
//! - `DELETE /cache/clear/:name` - Forget one named read
//! - `DELETE /cache/invalidate/:pattern` - Pattern invalidation
//! - `DELETE /cache/key/:key` - Delete a key
//! - `POST /cache/warm-up` - Warm the cache from the listing
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
