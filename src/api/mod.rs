//! API Module
//!
//! HTTP handlers and routing for the request cache.
//!
//! # Endpoints
//! - `POST /request` - Run a cache-aside request
//! - `GET /cache/:key` - Look up a cached value by key
//! - `DELETE /cache/:key` - Remove a cached value
//! - `DELETE /cache` - Reset the cache
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
