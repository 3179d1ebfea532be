//! LFU Policy Module
//!
//! Implements Least Frequently Used victim selection.

use std::collections::{HashMap, HashSet};

use crate::cache::{EvictionPolicy, EvictionStrategy};

#[derive(Debug, Clone, Copy)]
struct Usage {
    /// Touches after the first one
    count: u64,
    /// Insertion order, breaks ties between equal counts
    seq: u64,
}

// == LFU Policy ==
/// Tracks access counts for LFU eviction.
///
/// A key starts at 0 on its first touch and gains exactly 1 per later touch.
/// Among keys with the lowest count the one inserted first is the victim.
#[derive(Debug, Default)]
pub struct LfuPolicy {
    usage: HashMap<String, Usage>,
    next_seq: u64,
}

impl LfuPolicy {
    // == Constructor ==
    /// Creates a new empty LFU policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the access count of a tracked key.
    pub fn count(&self, key: &str) -> Option<u64> {
        self.usage.get(key).map(|u| u.count)
    }
}

impl EvictionPolicy for LfuPolicy {
    fn touch(&mut self, key: &str) {
        match self.usage.get_mut(key) {
            Some(usage) => usage.count += 1,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.usage.insert(key.to_string(), Usage { count: 0, seq });
            }
        }
    }

    fn forget(&mut self, key: &str) {
        self.usage.remove(key);
    }

    fn pick_victim(&self) -> Option<String> {
        self.usage
            .iter()
            .min_by_key(|(_, u)| (u.count, u.seq))
            .map(|(key, _)| key.clone())
    }

    fn contains(&self, key: &str) -> bool {
        self.usage.contains_key(key)
    }

    fn retain(&mut self, live: &HashSet<String>) {
        self.usage.retain(|k, _| live.contains(k));
    }

    fn clear(&mut self) {
        self.usage.clear();
    }

    fn len(&self) -> usize {
        self.usage.len()
    }

    fn strategy(&self) -> EvictionStrategy {
        EvictionStrategy::Lfu
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lfu_empty() {
        let lfu = LfuPolicy::new();
        assert_eq!(lfu.pick_victim(), None);
        assert!(lfu.is_empty());
    }

    #[test]
    fn test_lfu_counter_increments_every_touch() {
        let mut lfu = LfuPolicy::new();

        lfu.touch("a");
        assert_eq!(lfu.count("a"), Some(0));
        lfu.touch("a");
        assert_eq!(lfu.count("a"), Some(1));
        lfu.touch("a");
        lfu.touch("a");
        assert_eq!(lfu.count("a"), Some(3));
    }

    #[test]
    fn test_lfu_evicts_least_frequent() {
        let mut lfu = LfuPolicy::new();

        lfu.touch("a");
        lfu.touch("a");
        lfu.touch("a");
        lfu.touch("b");

        assert_eq!(lfu.pick_victim(), Some("b".to_string()));
    }

    #[test]
    fn test_lfu_tie_breaks_on_insertion_order() {
        let mut lfu = LfuPolicy::new();

        lfu.touch("x");
        lfu.touch("y");
        lfu.touch("z");

        assert_eq!(lfu.pick_victim(), Some("x".to_string()));

        lfu.touch("x");
        assert_eq!(lfu.pick_victim(), Some("y".to_string()));
    }

    #[test]
    fn test_lfu_forget_resets_count() {
        let mut lfu = LfuPolicy::new();

        lfu.touch("a");
        lfu.touch("a");
        lfu.forget("a");
        assert!(!lfu.contains("a"));

        lfu.touch("a");
        assert_eq!(lfu.count("a"), Some(0));
    }

    #[test]
    fn test_lfu_retain_and_clear() {
        let mut lfu = LfuPolicy::new();
        lfu.touch("a");
        lfu.touch("b");

        let live: HashSet<String> = ["a".to_string()].into_iter().collect();
        lfu.retain(&live);
        assert_eq!(lfu.len(), 1);
        assert_eq!(lfu.pick_victim(), Some("a".to_string()));

        lfu.clear();
        assert!(lfu.is_empty());
    }
}
