//! Response DTOs for the request cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::config::CacheConfig;

/// Response body for a successful `POST /request`
#[derive(Debug, Clone, Serialize)]
pub struct RequestResponse {
    /// Remote API name
    pub name: String,
    /// Result payload, embedded as JSON when it parses as JSON
    pub value: Value,
    /// Whether the result came from the cache
    pub cached: bool,
}

impl RequestResponse {
    pub fn new(name: impl Into<String>, value: String, cached: bool) -> Self {
        let value = serde_json::from_str(&value).unwrap_or(Value::String(value));
        Self {
            name: name.into(),
            value,
            cached,
        }
    }
}

/// Response body for `GET /cache/:key`
#[derive(Debug, Clone, Serialize)]
pub struct CacheValueResponse {
    pub key: String,
    pub value: String,
}

impl CacheValueResponse {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for `DELETE /cache/:key`, `DELETE /cache` and
/// `POST /request/queue`
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn removed(key: &str) -> Self {
        Self {
            message: format!("Key '{}' removed", key),
        }
    }

    pub fn reset() -> Self {
        Self {
            message: "Cache reset".to_string(),
        }
    }

    pub fn queued(name: &str) -> Self {
        Self {
            message: format!("Request '{}' queued", name),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Current total size in bytes
    pub total_size: u64,
    /// Configured maximum size in bytes
    pub max_cache_size: u64,
    /// Size above which eviction runs
    pub threshold_bytes: f64,
    /// `LRU` or `LFU`
    pub eviction_strategy: String,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: &CacheStats, config: &CacheConfig) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
            total_size: stats.total_size,
            max_cache_size: config.max_cache_size,
            threshold_bytes: config.threshold_bytes(),
            eviction_strategy: config.eviction_strategy.to_string(),
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Whether the cache store is open
    pub cache_initialized: bool,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(cache_initialized: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            cache_initialized,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_response_embeds_json() {
        let resp = RequestResponse::new("getUsers", r#"{"users":[1]}"#.to_string(), true);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["value"]["users"][0], 1);
        assert_eq!(json["cached"], true);
    }

    #[test]
    fn test_request_response_keeps_plain_text() {
        let resp = RequestResponse::new("ping", "pong".to_string(), false);
        assert_eq!(resp.value, Value::String("pong".to_string()));
    }

    #[test]
    fn test_stats_response_from_stats() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        stats.set_footprint(2, 30);

        let resp = StatsResponse::new(&stats, &CacheConfig::default());
        assert!((resp.hit_rate - 0.75).abs() < 0.001);
        assert_eq!(resp.total_size, 30);
        assert_eq!(resp.eviction_strategy, "LFU");
        assert_eq!(resp.threshold_bytes, 40_960.0);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy(true);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("Something went wrong"));
    }
}
