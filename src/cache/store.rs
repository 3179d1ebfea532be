//! Blob Store Module
//!
//! Collaborator traits for the key/value store backing the cache, plus an
//! in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};

// == Blob Store ==
/// A named collection of blob handles.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Opens the store called `name`, creating it if needed.
    async fn open(&self, name: &str) -> Result<Arc<dyn BlobHandle>>;

    /// Destroys the store called `name` and all its entries.
    ///
    /// Returns `true` if the store existed.
    async fn delete(&self, name: &str) -> Result<bool>;

    /// Whether this store offers the offline background-registration mode.
    fn supports_background_registration(&self) -> bool {
        false
    }

    /// Registers the background mode and returns the bootstrap entries to
    /// pre-populate.
    async fn register_background(&self) -> Result<Vec<CacheEntry>> {
        Err(CacheError::StoreFailure(
            "background registration is not supported".to_string(),
        ))
    }
}

// == Blob Handle ==
/// An opened store.
#[async_trait]
pub trait BlobHandle: Send + Sync {
    /// Writes an entry, replacing any entry under the same key.
    async fn put(&self, entry: CacheEntry) -> Result<()>;

    /// Reads an entry.
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>>;

    /// Deletes an entry. Returns `true` if it existed.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Lists every stored key.
    async fn list_keys(&self) -> Result<Vec<String>>;
}

// == Memory Blob Store ==
/// In-process blob store.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    stores: RwLock<HashMap<String, Arc<MemoryBlobHandle>>>,
    bootstrap: Option<Vec<CacheEntry>>,
}

impl MemoryBlobStore {
    /// Creates an empty store without background registration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that supports background registration and hands out
    /// `entries` as its bootstrap set.
    pub fn with_bootstrap(entries: Vec<CacheEntry>) -> Self {
        Self {
            stores: RwLock::new(HashMap::new()),
            bootstrap: Some(entries),
        }
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn open(&self, name: &str) -> Result<Arc<dyn BlobHandle>> {
        let mut stores = self.stores.write().await;
        let handle: Arc<dyn BlobHandle> = stores
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryBlobHandle::default()))
            .clone();
        Ok(handle)
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        let removed = self.stores.write().await.remove(name);
        if let Some(handle) = &removed {
            handle.entries.write().await.clear();
        }
        Ok(removed.is_some())
    }

    fn supports_background_registration(&self) -> bool {
        self.bootstrap.is_some()
    }

    async fn register_background(&self) -> Result<Vec<CacheEntry>> {
        self.bootstrap.clone().ok_or_else(|| {
            CacheError::StoreFailure("background registration is not supported".to_string())
        })
    }
}

/// Entries of one opened [`MemoryBlobStore`].
#[derive(Debug, Default)]
pub struct MemoryBlobHandle {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

#[async_trait]
impl BlobHandle for MemoryBlobHandle {
    async fn put(&self, entry: CacheEntry) -> Result<()> {
        self.entries.write().await.insert(entry.key.clone(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }
}
