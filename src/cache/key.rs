//! Cache Key Module
//!
//! Derives stable cache keys from a request name, its parameters and its body.

use std::fmt;

use serde_json::Value;
use sha2::{Digest, Sha256};

// == Cache Key ==
/// Opaque cache key: the request name followed by a digest of the request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// == Derive Key ==
/// Computes the cache key for `(request_name, params, body)`.
///
/// Object members are serialized in sorted key order, so two requests that
/// differ only in member order map to the same key. The result is
/// `"{request_name}:{sha256 hex}"`.
pub fn derive_key(request_name: &str, params: &Value, body: &Value) -> CacheKey {
    let mut canonical = String::new();
    write_canonical(&Value::String(request_name.to_string()), &mut canonical);
    canonical.push('|');
    write_canonical(params, &mut canonical);
    canonical.push('|');
    write_canonical(body, &mut canonical);

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hex::encode(hasher.finalize());

    CacheKey(format!("{}:{}", request_name, digest))
}

/// Appends the canonical JSON form of `value` to `out`.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut members: Vec<(&String, &Value)> = map.iter().collect();
            members.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, member)) in members.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(member, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
