//! Bounded Cache Module
//!
//! Size-bounded cache over a blob store, delegating victim selection to an
//! eviction policy.
//!
//! All state (store handle, policy metadata, total size) lives behind one
//! async mutex that is held across store I/O, so operations from concurrent
//! tasks are applied one at a time and the eviction loop always sees the
//! size left by the previous removal.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{BlobHandle, BlobStore, CacheEntry, CacheStats, EvictionPolicy};
use crate::config::{CacheConfig, DEFAULT_CACHE_NAME};
use crate::error::{CacheError, Result};

// == Cache State ==
struct CacheState {
    /// Open store, None while uninitialized
    handle: Option<Arc<dyn BlobHandle>>,
    /// Per-key usage metadata
    policy: Box<dyn EvictionPolicy>,
    /// Sum of `size_bytes` over live entries as of the last recomputation
    total_size: u64,
    stats: CacheStats,
}

impl CacheState {
    fn handle(&self) -> Result<Arc<dyn BlobHandle>> {
        self.handle.clone().ok_or_else(|| {
            warn!("Cache is not initialized.");
            CacheError::NotInitialized
        })
    }

    // == Recompute Size ==
    /// Recomputes the total size from the store and reconciles policy
    /// metadata with the live key set.
    async fn refresh_size(&mut self, handle: &Arc<dyn BlobHandle>) -> Result<()> {
        let mut live = HashSet::new();
        let mut total = 0u64;

        for key in handle.list_keys().await? {
            if let Some(entry) = handle.get(&key).await? {
                total += entry.size_bytes;
                live.insert(key);
            }
        }

        self.policy.retain(&live);
        let mut untracked: Vec<&String> = live.iter().filter(|k| !self.policy.contains(k)).collect();
        untracked.sort();
        for key in untracked {
            debug!("Tracking externally added key '{}'", key);
            self.policy.touch(key);
        }

        self.total_size = total;
        self.stats.set_footprint(live.len(), total);
        debug!("Updated cache size: {} bytes", total);
        Ok(())
    }

    async fn remove_key(&mut self, handle: &Arc<dyn BlobHandle>, key: &str) -> Result<bool> {
        let existed = handle.delete(key).await?;
        self.policy.forget(key);
        self.refresh_size(handle).await?;
        Ok(existed)
    }

    // == Perform Eviction ==
    /// Removes victims one at a time until the total size is within `limit`.
    ///
    /// Each removal, including its size recomputation, completes before the
    /// condition is checked again.
    async fn evict(&mut self, handle: &Arc<dyn BlobHandle>, limit: f64) -> Result<usize> {
        let mut evicted = 0;

        while self.total_size as f64 > limit {
            let Some(victim) = self.policy.pick_victim() else {
                warn!(
                    "{}",
                    CacheError::EvictionTermination {
                        total_size: self.total_size,
                        limit,
                    }
                );
                break;
            };

            self.policy.record_eviction(&victim);
            self.remove_key(handle, &victim).await?;
            self.stats.record_eviction();
            evicted += 1;
            info!(
                "Evicted {} entry with key '{}' from the cache.",
                self.policy.strategy(),
                victim
            );
        }

        Ok(evicted)
    }
}

// == Bounded Cache ==
/// Cache with a total byte budget and threshold-triggered eviction.
///
/// Build one instance at startup and share it as `Arc<BoundedCache>`.
pub struct BoundedCache {
    config: CacheConfig,
    name: String,
    store: Arc<dyn BlobStore>,
    state: Mutex<CacheState>,
}

impl BoundedCache {
    // == Constructor ==
    /// Creates an uninitialized cache over the store named `api-cache`.
    pub fn new(config: CacheConfig, store: Arc<dyn BlobStore>) -> Self {
        Self::with_name(config, DEFAULT_CACHE_NAME, store)
    }

    /// Creates an uninitialized cache over the store called `name`.
    pub fn with_name(config: CacheConfig, name: impl Into<String>, store: Arc<dyn BlobStore>) -> Self {
        let config = config.validated();
        let policy = config.eviction_strategy.build();
        Self {
            config,
            name: name.into(),
            store,
            state: Mutex::new(CacheState {
                handle: None,
                policy,
                total_size: 0,
                stats: CacheStats::new(),
            }),
        }
    }

    // == Init ==
    /// Opens the backing store. A second call is a no-op.
    ///
    /// With background registration enabled and supported by the store, the
    /// store's bootstrap entries are written first; if registration fails the
    /// plain store is opened instead.
    pub async fn init(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.open_locked(&mut state).await
    }

    async fn open_locked(&self, state: &mut CacheState) -> Result<()> {
        if state.handle.is_some() {
            debug!("Cache already initialized");
            return Ok(());
        }

        let handle = if self.config.use_background_registration
            && self.store.supports_background_registration()
        {
            info!("Trying background registration");
            match self.open_registered(state).await {
                Ok(handle) => {
                    info!("Background registration done and cache initialized.");
                    handle
                }
                Err(err) => {
                    warn!("Background registration failed, using normal cache: {}", err);
                    self.store.open(&self.name).await?
                }
            }
        } else {
            if self.config.use_background_registration {
                info!("Store has no background registration, using normal cache.");
            }
            let handle = self.store.open(&self.name).await?;
            info!("Using normal cache.");
            handle
        };

        state.handle = Some(handle.clone());
        state.refresh_size(&handle).await?;
        state.evict(&handle, self.config.threshold_bytes()).await?;
        Ok(())
    }

    async fn open_registered(&self, state: &mut CacheState) -> Result<Arc<dyn BlobHandle>> {
        let bootstrap = self.store.register_background().await?;
        let handle = self.store.open(&self.name).await?;
        for entry in bootstrap {
            let key = entry.key.clone();
            handle.put(entry).await?;
            state.policy.touch(&key);
        }
        Ok(handle)
    }

    // == Add ==
    /// Stores `value` under `key`, then evicts until the cache is back
    /// within its threshold.
    pub async fn add(&self, key: &str, value: impl Into<String>) -> Result<()> {
        let mut state = self.state.lock().await;
        let handle = state.handle()?;

        handle.put(CacheEntry::new(key, value)).await?;
        state.policy.touch(key);
        state.refresh_size(&handle).await?;
        state.evict(&handle, self.config.threshold_bytes()).await?;

        info!("Added key {} to the cache.", key);
        Ok(())
    }

    // == Add Batch ==
    /// Stores every item, then recomputes the size and evicts once.
    pub async fn add_batch<I>(&self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut state = self.state.lock().await;
        let handle = state.handle()?;

        let mut count = 0;
        for (key, value) in items {
            handle.put(CacheEntry::new(key.clone(), value)).await?;
            state.policy.touch(&key);
            count += 1;
        }

        state.refresh_size(&handle).await?;
        state.evict(&handle, self.config.threshold_bytes()).await?;

        info!("Added {} items to the cache.", count);
        Ok(())
    }

    // == Remove ==
    /// Removes `key`. Absent keys are not an error.
    pub async fn remove(&self, key: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        let handle = state.handle()?;

        if state.remove_key(&handle, key).await? {
            info!("Removed key {} from the cache.", key);
        } else {
            debug!("Key {} was not in the cache.", key);
        }
        Ok(())
    }

    // == Search ==
    /// Returns the value stored under `key`, rewarding the access on a hit.
    pub async fn search(&self, key: &str) -> Result<Option<String>> {
        let mut state = self.state.lock().await;
        let handle = state.handle()?;

        match handle.get(key).await? {
            Some(entry) => {
                state.policy.touch(key);
                state.stats.record_hit();
                debug!("Found value for key '{}' in the cache.", key);
                Ok(Some(entry.value))
            }
            None => {
                state.stats.record_miss();
                debug!("No value found for key '{}' in the cache.", key);
                Ok(None)
            }
        }
    }

    // == Reset ==
    /// Destroys the backing store and all metadata. The cache is
    /// uninitialized afterwards.
    pub async fn reset(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.reset_locked(&mut state).await
    }

    /// Resets and reopens the cache as one operation, so no other operation
    /// observes it uninitialized in between.
    pub async fn reset_and_init(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.reset_locked(&mut state).await?;
        self.open_locked(&mut state).await
    }

    async fn reset_locked(&self, state: &mut CacheState) -> Result<()> {
        self.store.delete(&self.name).await?;

        state.handle = None;
        state.total_size = 0;
        state.policy.clear();
        state.stats.set_footprint(0, 0);

        info!("Cache '{}' reset.", self.name);
        Ok(())
    }

    // == Accessors ==
    pub async fn is_initialized(&self) -> bool {
        self.state.lock().await.handle.is_some()
    }

    /// Total size in bytes as of the last recomputation.
    pub async fn total_size(&self) -> u64 {
        self.state.lock().await.total_size
    }

    /// Number of keys with policy metadata.
    pub async fn tracked_keys(&self) -> usize {
        self.state.lock().await.policy.len()
    }

    pub async fn stats(&self) -> CacheStats {
        self.state.lock().await.stats.clone()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}
