//! Request Cache - a cache-aside layer in front of a remote API
//!
//! Deduplicates identical requests through a size-bounded cache with LRU or
//! LFU eviction.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod tasks;

pub use api::AppState;
pub use cache::{derive_key, BoundedCache, CacheKey, EvictionStrategy, MemoryBlobStore};
pub use config::{CacheConfig, Config};
pub use error::CacheError;
pub use orchestrator::{HttpFetcher, Orchestrator, RemoteFetcher, RequestEvent};
pub use tasks::{spawn_event_logger, spawn_request_dispatcher};
