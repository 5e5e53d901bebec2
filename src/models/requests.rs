//! Request DTOs for the cache admin API

use serde::Deserialize;

use crate::warmup::DEFAULT_WARM_UP_LIMIT;

/// Query string for POST /cache/warm-up
///
/// # Fields
/// - `limit`: How many listed items to warm (default 10)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WarmUpQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

impl WarmUpQuery {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_WARM_UP_LIMIT)
    }

    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.limit == Some(0) {
            return Some("Limit must be at least 1".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warm_up_query_default_limit() {
        let query: WarmUpQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit(), DEFAULT_WARM_UP_LIMIT);
        assert!(query.validate().is_none());
    }

    #[test]
    fn test_warm_up_query_zero_limit() {
        let query = WarmUpQuery { limit: Some(0) };
        assert!(query.validate().is_some());
    }
}
