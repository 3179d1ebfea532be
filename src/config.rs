//! Configuration Module
//!
//! Handles loading and managing cache and server configuration from
//! environment variables.

use std::env;
use std::str::FromStr;

use tracing::warn;

use crate::cache::EvictionStrategy;

/// Default maximum total cache size in bytes
pub const DEFAULT_MAX_CACHE_SIZE: u64 = 51_200;

/// Default eviction threshold (fraction of `max_cache_size`)
pub const DEFAULT_EVICTION_THRESHOLD: f64 = 0.8;

/// Default name of the backing blob store
pub const DEFAULT_CACHE_NAME: &str = "api-cache";

// == Cache Config ==
/// Cache construction parameters. Immutable once the cache is built.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Victim selection strategy
    pub eviction_strategy: EvictionStrategy,
    /// Try the store's background-registration mode on `init`
    pub use_background_registration: bool,
    /// Maximum total size of all entries in bytes
    pub max_cache_size: u64,
    /// Fraction of `max_cache_size` above which eviction runs, in (0, 1]
    pub eviction_threshold: f64,
}

impl CacheConfig {
    /// Creates a config with the given strategy and defaults for everything else.
    pub fn with_strategy(eviction_strategy: EvictionStrategy) -> Self {
        Self {
            eviction_strategy,
            ..Self::default()
        }
    }

    /// Size in bytes above which the eviction loop runs.
    pub fn threshold_bytes(&self) -> f64 {
        self.max_cache_size as f64 * self.eviction_threshold
    }

    /// Returns the config with an out-of-range threshold replaced by the default.
    pub fn validated(mut self) -> Self {
        if !(self.eviction_threshold > 0.0 && self.eviction_threshold <= 1.0) {
            warn!(
                "Eviction threshold {} is outside (0, 1], using {}",
                self.eviction_threshold, DEFAULT_EVICTION_THRESHOLD
            );
            self.eviction_threshold = DEFAULT_EVICTION_THRESHOLD;
        }
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            eviction_strategy: EvictionStrategy::Lfu,
            use_background_registration: false,
            max_cache_size: DEFAULT_MAX_CACHE_SIZE,
            eviction_threshold: DEFAULT_EVICTION_THRESHOLD,
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache construction parameters
    pub cache: CacheConfig,
    /// Name of the backing blob store
    pub cache_name: String,
    /// HTTP server port
    pub server_port: u16,
    /// Base URL the remote fetcher posts requests to
    pub upstream_url: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `EVICTION_STRATEGY` - `LRU` or `LFU` (default: LFU)
    /// - `USE_BACKGROUND_REGISTRATION` - `true`/`false` (default: false)
    /// - `MAX_CACHE_SIZE` - Maximum cache size in bytes (default: 51200)
    /// - `EVICTION_THRESHOLD` - Fraction in (0, 1] (default: 0.8)
    /// - `CACHE_NAME` - Backing store name (default: api-cache)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `UPSTREAM_URL` - Remote API base URL (default: http://localhost:8080)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let cache = CacheConfig {
            eviction_strategy: env_parse("EVICTION_STRATEGY")
                .unwrap_or(defaults.cache.eviction_strategy),
            use_background_registration: env_parse("USE_BACKGROUND_REGISTRATION")
                .unwrap_or(defaults.cache.use_background_registration),
            max_cache_size: env_parse("MAX_CACHE_SIZE").unwrap_or(defaults.cache.max_cache_size),
            eviction_threshold: env_parse("EVICTION_THRESHOLD")
                .unwrap_or(defaults.cache.eviction_threshold),
        }
        .validated();

        Self {
            cache,
            cache_name: env::var("CACHE_NAME").unwrap_or(defaults.cache_name),
            server_port: env_parse("SERVER_PORT").unwrap_or(defaults.server_port),
            upstream_url: env::var("UPSTREAM_URL").unwrap_or(defaults.upstream_url),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            cache_name: DEFAULT_CACHE_NAME.to_string(),
            server_port: 3000,
            upstream_url: "http://localhost:8080".to_string(),
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
