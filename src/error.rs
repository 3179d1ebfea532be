//! Error types for the request cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache and the request orchestrator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// A cache operation was attempted before `init`
    #[error("Cache is not initialized")]
    NotInitialized,

    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Backing blob store failed on put/get/delete/open
    #[error("Store failure: {0}")]
    StoreFailure(String),

    /// Remote fetch collaborator failed
    #[error("Fetch failure: {0}")]
    FetchFailure(String),

    /// Policy engine had no victim while the cache was still over threshold
    #[error("Eviction stopped with no victim: total size {total_size} bytes exceeds limit {limit} bytes")]
    EvictionTermination { total_size: u64, limit: f64 },

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error (e.g. a request task panicked)
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotInitialized => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::StoreFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::FetchFailure(_) => StatusCode::BAD_GATEWAY,
            CacheError::EvictionTermination { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the request cache.
pub type Result<T> = std::result::Result<T, CacheError>;
