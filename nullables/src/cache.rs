//! Nullable response cache — a cache that never expires on its own.

use purge_store::ResponseCache;
use purge_utils::CallStats;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// An in-memory response cache for testing.
///
/// Entries only disappear through `del` or [`NullResponseCache::expire`].
/// Every call is counted so tests can assert on TTL refreshes and writes.
pub struct NullResponseCache {
    entries: Mutex<BTreeMap<String, Value>>,
    stats: CallStats,
}

impl NullResponseCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            stats: CallStats::new(),
        }
    }

    /// Simulate TTL expiry of a single entry.
    pub fn expire(&self, key: &str) -> bool {
        self.entries.lock().unwrap().remove(key).is_some()
    }

    /// Peek at an entry without counting a `get`.
    pub fn peek(&self, key: &str) -> Option<Value> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of calls to the named operation (`get`, `set`, `ttl`, `keys`, `del`).
    pub fn calls(&self, op: &str) -> u64 {
        self.stats.get(op)
    }
}

impl Default for NullResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseCache for NullResponseCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.stats.increment("get");
        self.peek(key)
    }

    fn set(&self, key: &str, value: Value) {
        self.stats.increment("set");
        self.entries.lock().unwrap().insert(key.to_string(), value);
    }

    fn ttl(&self, key: &str) -> bool {
        self.stats.increment("ttl");
        self.entries.lock().unwrap().contains_key(key)
    }

    fn keys(&self) -> Vec<String> {
        self.stats.increment("keys");
        self.entries.lock().unwrap().keys().cloned().collect()
    }

    fn del(&self, keys: &[String]) -> usize {
        self.stats.increment("del");
        let mut entries = self.entries.lock().unwrap();
        keys.iter().filter(|key| entries.remove(*key).is_some()).count()
    }
}
