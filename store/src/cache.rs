//! General-purpose response cache trait.

use serde_json::Value;

/// An in-process key/value cache whose entries expire after a default TTL.
///
/// Methods are synchronous: implementations are expected to be local memory,
/// never a network hop.
pub trait ResponseCache: Send + Sync {
    /// Fetch a live entry.
    fn get(&self, key: &str) -> Option<Value>;

    /// Insert or overwrite an entry with the cache's default TTL.
    fn set(&self, key: &str, value: Value);

    /// Push an entry's expiry out by the default TTL without rewriting it.
    /// Returns `false` if the key is absent.
    fn ttl(&self, key: &str) -> bool;

    /// Keys of all live entries.
    fn keys(&self) -> Vec<String>;

    /// Remove the given keys. Returns how many were present.
    fn del(&self, keys: &[String]) -> usize;
}
