//! Cache Entry Module
//!
//! Defines the sized value stored in the backing blob store.

// == Cache Entry ==
/// A single cached value together with its byte size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Key the entry is stored under
    pub key: String,
    /// The stored value
    pub value: String,
    /// Size of `value` in bytes, used for total size accounting
    pub size_bytes: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Wraps a value into a sized entry.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            key: key.into(),
            size_bytes: value.len() as u64,
            value,
        }
    }
}
