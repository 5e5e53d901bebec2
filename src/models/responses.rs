//! Response DTOs for the cache admin API

use serde::Serialize;

use crate::warmup::WarmUpReport;

/// Response body for DELETE /cache/clear and DELETE /cache/invalidate/:pattern
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    /// Number of entries removed
    pub deleted: usize,
}

impl ClearResponse {
    pub fn new(pattern: &str, deleted: usize) -> Self {
        Self {
            message: format!("Cleared {} cache entries matching '{}'", deleted, pattern),
            deleted,
        }
    }
}

/// Response body for DELETE /cache/clear/:name
#[derive(Debug, Clone, Serialize)]
pub struct ForgetResponse {
    pub message: String,
    /// Whether a cached entry existed and was removed
    pub success: bool,
}

impl ForgetResponse {
    pub fn new(name: &str, success: bool) -> Self {
        Self {
            message: format!("Cache cleared for folder: {}", name),
            success,
        }
    }
}

/// Response body for POST /cache/warm-up
#[derive(Debug, Clone, Serialize)]
pub struct WarmUpResponse {
    pub message: String,
    /// Items read and cached
    pub warmed: usize,
    /// Items read, not-found ones included
    pub attempted: usize,
}

impl From<WarmUpReport> for WarmUpResponse {
    fn from(report: WarmUpReport) -> Self {
        Self {
            message: "Cache warm-up completed".to_string(),
            warmed: report.warmed,
            attempted: report.attempted,
        }
    }
}

/// Response body for DELETE /cache/key/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    pub cache_enabled: bool,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy(cache_enabled: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            cache_enabled,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
