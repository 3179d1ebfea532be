//! Eviction Policy Module
//!
//! Defines the capability shared by eviction policies and selects the
//! implementation for a configured strategy.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::cache::{LfuPolicy, LruPolicy};

// == Eviction Strategy ==
/// Which eviction policy the cache is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionStrategy {
    /// Least recently used
    Lru,
    /// Least frequently used
    #[default]
    Lfu,
}

impl EvictionStrategy {
    /// Builds a fresh, empty policy for this strategy.
    pub fn build(self) -> Box<dyn EvictionPolicy> {
        match self {
            EvictionStrategy::Lru => Box::new(LruPolicy::new()),
            EvictionStrategy::Lfu => Box::new(LfuPolicy::new()),
        }
    }
}

impl fmt::Display for EvictionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionStrategy::Lru => f.write_str("LRU"),
            EvictionStrategy::Lfu => f.write_str("LFU"),
        }
    }
}

impl FromStr for EvictionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LRU" => Ok(EvictionStrategy::Lru),
            "LFU" => Ok(EvictionStrategy::Lfu),
            other => Err(format!("unknown eviction strategy '{}'", other)),
        }
    }
}

// == Eviction Policy ==
/// Per-key usage metadata and victim selection.
///
/// Implementations never remove entries themselves: the bounded cache removes
/// the victim and then calls [`EvictionPolicy::forget`].
pub trait EvictionPolicy: Send + Sync + fmt::Debug {
    /// Records an access to `key`, creating its metadata on first touch.
    fn touch(&mut self, key: &str);

    /// Hook called right before a victim is removed. No-op by default.
    fn record_eviction(&mut self, _key: &str) {}

    /// Drops the metadata of `key`, if any.
    fn forget(&mut self, key: &str);

    /// Returns the key that should be evicted next. Never mutates.
    fn pick_victim(&self) -> Option<String>;

    /// Checks if a key is being tracked.
    fn contains(&self, key: &str) -> bool;

    /// Drops metadata for every key not in `live`.
    fn retain(&mut self, live: &HashSet<String>);

    /// Drops all metadata.
    fn clear(&mut self);

    /// Returns the number of tracked keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn strategy(&self) -> EvictionStrategy;
}
