//! LRU Policy Module
//!
//! Implements Least Recently Used victim selection.

use std::collections::{HashSet, VecDeque};

use crate::cache::{EvictionPolicy, EvictionStrategy};

// == LRU Policy ==
/// Tracks access order for LRU eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Position in the deque stands in for the last-touch timestamp, so two
/// keys never tie and the victim is always deterministic.
#[derive(Debug, Default)]
pub struct LruPolicy {
    /// Order of keys by access time
    order: VecDeque<String>,
    /// Keys present in `order`, for constant-time membership checks
    members: HashSet<String>,
}

impl LruPolicy {
    // == Constructor ==
    /// Creates a new empty LRU policy.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EvictionPolicy for LruPolicy {
    // == Touch ==
    /// Marks a key as recently used (moves to front).
    fn touch(&mut self, key: &str) {
        if !self.members.insert(key.to_string()) {
            self.order.retain(|k| k != key);
        }
        self.order.push_front(key.to_string());
    }

    fn forget(&mut self, key: &str) {
        if self.members.remove(key) {
            self.order.retain(|k| k != key);
        }
    }

    // == Pick Victim ==
    /// Returns the least recently used key without removing it.
    fn pick_victim(&self) -> Option<String> {
        self.order.back().cloned()
    }

    fn contains(&self, key: &str) -> bool {
        self.members.contains(key)
    }

    fn retain(&mut self, live: &HashSet<String>) {
        self.order.retain(|k| live.contains(k));
        self.members.retain(|k| live.contains(k));
    }

    fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn strategy(&self) -> EvictionStrategy {
        EvictionStrategy::Lru
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_new() {
        let lru = LruPolicy::new();
        assert!(lru.is_empty());
        assert_eq!(lru.pick_victim(), None);
    }

    #[test]
    fn test_lru_touch_new_key() {
        let mut lru = LruPolicy::new();

        lru.touch("key1");
        lru.touch("key2");
        lru.touch("key3");

        assert_eq!(lru.len(), 3);
        // key1 is oldest (added first)
        assert_eq!(lru.pick_victim(), Some("key1".to_string()));
    }

    #[test]
    fn test_lru_pick_victim_does_not_mutate() {
        let mut lru = LruPolicy::new();
        lru.touch("key1");

        assert_eq!(lru.pick_victim(), Some("key1".to_string()));
        assert_eq!(lru.pick_victim(), Some("key1".to_string()));
        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn test_lru_touch_order_a_b_a_c() {
        let mut lru = LruPolicy::new();

        lru.touch("a");
        lru.touch("b");
        lru.touch("a");
        lru.touch("c");

        // b is the only key not touched since its first access
        assert_eq!(lru.pick_victim(), Some("b".to_string()));
    }

    #[test]
    fn test_lru_forget() {
        let mut lru = LruPolicy::new();

        lru.touch("key1");
        lru.touch("key2");
        lru.touch("key3");

        lru.forget("key1");

        assert_eq!(lru.len(), 2);
        assert!(!lru.contains("key1"));
        assert_eq!(lru.pick_victim(), Some("key2".to_string()));
    }

    #[test]
    fn test_lru_forget_nonexistent_key() {
        let mut lru = LruPolicy::new();

        lru.touch("key1");
        lru.touch("key2");

        lru.forget("nonexistent");

        assert_eq!(lru.len(), 2);
        assert!(lru.contains("key1"));
        assert!(lru.contains("key2"));
    }

    #[test]
    fn test_lru_touch_same_key_multiple_times() {
        let mut lru = LruPolicy::new();

        lru.touch("key1");
        lru.touch("key1");
        lru.touch("key1");

        // Should only have one entry
        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn test_lru_retain_live_keys() {
        let mut lru = LruPolicy::new();
        lru.touch("a");
        lru.touch("b");
        lru.touch("c");

        let live: HashSet<String> = ["b".to_string()].into_iter().collect();
        lru.retain(&live);

        assert_eq!(lru.len(), 1);
        assert!(lru.contains("b"));

        lru.clear();
        assert!(lru.is_empty());
    }

    #[test]
    fn test_lru_membership_follows_order() {
        let mut lru = LruPolicy::new();
        lru.touch("a");
        lru.touch("b");
        lru.touch("a");

        assert_eq!(lru.order.len(), lru.members.len());

        lru.forget("a");
        assert!(!lru.contains("a"));
        assert_eq!(lru.order, VecDeque::from(vec!["b".to_string()]));
        assert_eq!(lru.members.len(), 1);

        lru.touch("a");
        assert!(lru.contains("a"));
        assert_eq!(lru.pick_victim(), Some("b".to_string()));
    }
}
