//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror. The facade itself never
//! returns errors; these types cover the admin surface and the orchestrator.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Error type surfaced by the admin routes and warm-up.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Requested capability is not wired into this cache
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Backing data source failed
    #[error("Data source error: {0}")]
    Source(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Source(_) => StatusCode::BAD_GATEWAY,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;

// == Fetch Error ==
/// Outcome of a cache-aside read that could not produce rows.
///
/// Data-source errors are carried unchanged in `Source`.
#[derive(Error, Debug)]
pub enum FetchError<E> {
    /// The data source reported no data for the parameters
    #[error("no data found")]
    NotFound,

    /// The data source failed
    #[error("data source failure: {0}")]
    Source(E),
}

impl<E> FetchError<E> {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound)
    }

    /// Returns the source error, if any.
    pub fn into_source(self) -> Option<E> {
        match self {
            FetchError::Source(err) => Some(err),
            FetchError::NotFound => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CacheError::NotFound("k".into()), StatusCode::NOT_FOUND),
            (CacheError::InvalidRequest("bad".into()), StatusCode::BAD_REQUEST),
            (CacheError::Unavailable("warm-up".into()), StatusCode::SERVICE_UNAVAILABLE),
            (CacheError::Source("db down".into()), StatusCode::BAD_GATEWAY),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_fetch_error_accessors() {
        let not_found: FetchError<std::io::Error> = FetchError::NotFound;
        assert!(not_found.is_not_found());
        assert!(not_found.into_source().is_none());

        let failed = FetchError::Source(std::io::Error::other("timeout"));
        assert!(!failed.is_not_found());
        assert_eq!(failed.to_string(), "data source failure: timeout");
        assert_eq!(failed.into_source().unwrap().to_string(), "timeout");
    }
}
