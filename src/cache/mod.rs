//! Cache Module
//!
//! Provides a size-bounded request cache with pluggable LRU/LFU eviction.

mod bounded;
mod entry;
mod key;
mod lfu;
mod lru;
mod policy;
mod stats;
mod store;


// Re-export public types
pub use bounded::BoundedCache;
pub use entry::CacheEntry;
pub use key::{derive_key, CacheKey};
pub use lfu::LfuPolicy;
pub use lru::LruPolicy;
pub use policy::{EvictionPolicy, EvictionStrategy};
pub use stats::CacheStats;
pub use store::{BlobHandle, BlobStore, MemoryBlobHandle, MemoryBlobStore};
