//! Request Orchestrator
//!
//! Cache-aside handling of one logical request: derive the key, look it up,
//! and on a miss fetch remotely and store the result.

mod fetcher;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{derive_key, BoundedCache, CacheKey};
use crate::error::{CacheError, Result};
use crate::models::ApiRequest;

pub use fetcher::{HttpFetcher, RemoteFetcher};

// == Request Event ==
/// Terminal outcome of one request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestEvent {
    Success {
        name: String,
        value: String,
        /// True when the value was read from the cache
        from_cache: bool,
    },
    Failure {
        name: String,
        error: CacheError,
    },
}

impl RequestEvent {
    pub fn name(&self) -> &str {
        match self {
            RequestEvent::Success { name, .. } | RequestEvent::Failure { name, .. } => name,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RequestEvent::Success { .. })
    }
}

type FetchOutcome = Result<String>;

/// Role of a request that missed the cache.
enum Flight {
    /// Fetches and publishes the outcome
    Leader(broadcast::Sender<FetchOutcome>),
    /// Waits for the leader of an identical request
    Follower(broadcast::Receiver<FetchOutcome>),
}

// == Orchestrator ==
/// Runs requests against a shared cache and remote fetcher.
///
/// Identical requests that miss the cache at the same time share a single
/// remote fetch.
pub struct Orchestrator {
    cache: Arc<BoundedCache>,
    fetcher: Arc<dyn RemoteFetcher>,
    /// Fetches in progress, keyed by cache key
    in_flight: Mutex<HashMap<CacheKey, broadcast::Receiver<FetchOutcome>>>,
}

impl Orchestrator {
    pub fn new(cache: Arc<BoundedCache>, fetcher: Arc<dyn RemoteFetcher>) -> Self {
        Self {
            cache,
            fetcher,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn cache(&self) -> &Arc<BoundedCache> {
        &self.cache
    }

    // == Handle ==
    /// Runs one request to its terminal event. Errors are never retried.
    pub async fn handle(&self, request: ApiRequest) -> RequestEvent {
        let name = request.name.clone();
        match self.run(request).await {
            Ok((value, from_cache)) => RequestEvent::Success {
                name,
                value,
                from_cache,
            },
            Err(error) => {
                warn!("Request {} failed: {}", name, error);
                RequestEvent::Failure { name, error }
            }
        }
    }

    // == Dispatch ==
    /// Spawns [`Orchestrator::handle`] as its own task.
    pub fn dispatch(self: &Arc<Self>, request: ApiRequest) -> JoinHandle<RequestEvent> {
        let orchestrator = Arc::clone(self);
        tokio::spawn(async move { orchestrator.handle(request).await })
    }

    async fn run(&self, request: ApiRequest) -> Result<(String, bool)> {
        debug!("Received request {}", request.name);
        if let Some(message) = request.validate() {
            return Err(CacheError::InvalidRequest(message));
        }

        self.cache.init().await?;

        let key = derive_key(&request.name, &request.params, &request.body);
        debug!("Derived key {}", key);

        // The in-flight lock is held across the lookup, and a leader only
        // leaves the map after storing its value, so a miss here means no
        // identical fetch has completed since.
        let flight = {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(value) = self.cache.search(key.as_str()).await? {
                info!("Cache hit for {}", request.name);
                return Ok((value, true));
            }
            join_or_lead(&mut in_flight, &key)
        };

        match flight {
            Flight::Follower(mut outcome) => {
                info!("Cache miss for {}, joining in-flight fetch", request.name);
                let value = outcome.recv().await.map_err(|_| {
                    CacheError::Internal(format!("in-flight fetch for {} was cancelled", request.name))
                })??;
                Ok((value, false))
            }
            Flight::Leader(publish) => {
                info!("Cache miss for {}, fetching remotely", request.name);
                let outcome = self.fetch_and_store(&request, &key).await;

                let mut in_flight = self.in_flight.lock().await;
                in_flight.remove(&key);
                // Err only means no identical request joined
                let _ = publish.send(outcome.clone());

                outcome.map(|value| (value, false))
            }
        }
    }

    async fn fetch_and_store(&self, request: &ApiRequest, key: &CacheKey) -> FetchOutcome {
        let value = self
            .fetcher
            .fetch(&request.name, &request.params, &request.body)
            .await?;

        self.cache.add(key.as_str(), value.clone()).await?;
        Ok(value)
    }
}

/// Joins the fetch in progress for `key`, or registers a new one.
///
/// An entry whose leader went away without publishing is replaced.
fn join_or_lead(
    in_flight: &mut HashMap<CacheKey, broadcast::Receiver<FetchOutcome>>,
    key: &CacheKey,
) -> Flight {
    if let Some(existing) = in_flight.get(key) {
        let mut outcome = existing.resubscribe();
        if !matches!(outcome.try_recv(), Err(TryRecvError::Closed)) {
            return Flight::Follower(outcome);
        }
        debug!("Replacing abandoned fetch for {}", key);
    }

    let (publish, outcome) = broadcast::channel(1);
    in_flight.insert(key.clone(), outcome);
    Flight::Leader(publish)
}
