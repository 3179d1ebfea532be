//! API Handlers
//!
//! HTTP request handlers for each request cache endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tokio::sync::mpsc;

use crate::cache::{BlobStore, BoundedCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    ApiRequest, CacheValueResponse, HealthResponse, MessageResponse, RequestResponse, StatsResponse,
};
use crate::orchestrator::{Orchestrator, RemoteFetcher, RequestEvent};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared bounded cache
    pub cache: Arc<BoundedCache>,
    /// Orchestrator running requests against `cache`
    pub orchestrator: Arc<Orchestrator>,
    /// Inbound channel of the request dispatcher, if one is running
    pub requests: Option<mpsc::UnboundedSender<ApiRequest>>,
}

impl AppState {
    /// Creates a new AppState around an orchestrator and its cache.
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            cache: orchestrator.cache().clone(),
            orchestrator,
            requests: None,
        }
    }

    /// Routes queued requests to a running dispatcher.
    pub fn with_dispatcher(mut self, requests: mpsc::UnboundedSender<ApiRequest>) -> Self {
        self.requests = Some(requests);
        self
    }

    /// Builds the cache and orchestrator from configuration.
    pub fn from_config(
        config: &Config,
        store: Arc<dyn BlobStore>,
        fetcher: Arc<dyn RemoteFetcher>,
    ) -> Self {
        let cache = BoundedCache::with_name(config.cache.clone(), config.cache_name.clone(), store);
        Self::new(Arc::new(Orchestrator::new(Arc::new(cache), fetcher)))
    }
}

/// Handler for POST /request
///
/// Runs one cache-aside request as its own task.
pub async fn request_handler(
    State(state): State<AppState>,
    Json(req): Json<ApiRequest>,
) -> Result<Json<RequestResponse>> {
    let event = state
        .orchestrator
        .dispatch(req)
        .await
        .map_err(|e| CacheError::Internal(format!("request task failed: {}", e)))?;

    match event {
        RequestEvent::Success {
            name,
            value,
            from_cache,
        } => Ok(Json(RequestResponse::new(name, value, from_cache))),
        RequestEvent::Failure { error, .. } => Err(error),
    }
}

/// Handler for POST /request/queue
///
/// Hands the request to the dispatcher and returns at once. Its outcome is
/// reported as a dispatcher event.
pub async fn enqueue_handler(
    State(state): State<AppState>,
    Json(req): Json<ApiRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let requests = state
        .requests
        .as_ref()
        .ok_or_else(|| CacheError::Internal("request dispatcher is not running".to_string()))?;

    let response = MessageResponse::queued(&req.name);
    requests
        .send(req)
        .map_err(|_| CacheError::Internal("request dispatcher has stopped".to_string()))?;

    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// Handler for GET /cache/:key
pub async fn get_cached_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<CacheValueResponse>> {
    match state.cache.search(&key).await? {
        Some(value) => Ok(Json(CacheValueResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /cache/:key
pub async fn remove_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.cache.remove(&key).await?;
    Ok(Json(MessageResponse::removed(&key)))
}

/// Handler for DELETE /cache
///
/// Drops every entry and reopens an empty store.
pub async fn reset_handler(State(state): State<AppState>) -> Result<Json<MessageResponse>> {
    state.cache.reset_and_init().await?;
    Ok(Json(MessageResponse::reset()))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;
    Json(StatsResponse::new(&stats, state.cache.config()))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.is_initialized().await))
}
