//! API Routes
//!
//! Configures the Axum router with all request cache endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    enqueue_handler, get_cached_handler, health_handler, remove_handler, request_handler,
    reset_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /request` - Run a cache-aside request
/// - `POST /request/queue` - Hand a request to the dispatcher (202)
/// - `GET /cache/:key` - Look up a cached value by key
/// - `DELETE /cache/:key` - Remove a cached value
/// - `DELETE /cache` - Reset the cache
/// - `GET /stats` - Get cache statistics
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
        .route("/request", post(request_handler))
        .route("/request/queue", post(enqueue_handler))
        .route("/cache", delete(reset_handler))
        .route("/cache/:key", get(get_cached_handler).delete(remove_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
