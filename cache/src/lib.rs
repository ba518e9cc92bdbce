//! In-process response cache with a default time-to-live.
//!
//! Entries expire a fixed interval after they were last written or
//! refreshed. Expired entries are invisible to every read. They are dropped
//! when read by key, on every write, on every key listing, and via
//! [`MemoryCache::purge_expired`].

use purge_store::ResponseCache;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default time-to-live: one hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

struct Entry {
    value: Value,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// Drop expired entries in place, returning how many went.
fn sweep(entries: &mut HashMap<String, Entry>, now: Instant) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| entry.is_live(now));
    let removed = before - entries.len();
    if removed > 0 {
        tracing::debug!(removed, "dropped expired cache entries");
    }
    removed
}

/// Thread-safe TTL cache keyed by string.
pub struct MemoryCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of stored entries, including expired ones not yet dropped.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        // A poisoned cache is still a valid cache: entries are written whole.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn deadline(&self, now: Instant) -> Option<Instant> {
        now.checked_add(self.ttl)
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<Value> {
        let mut entries = self.lock();
        let value = entries
            .get(key)
            .map(|entry| entry.is_live(now).then(|| entry.value.clone()));
        if let Some(None) = value {
            entries.remove(key);
        }
        value.flatten()
    }

    fn set_at(&self, key: &str, value: Value, now: Instant) {
        let mut entries = self.lock();
        sweep(&mut entries, now);
        entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: self.deadline(now),
            },
        );
    }

    fn ttl_at(&self, key: &str, now: Instant) -> bool {
        let mut entries = self.lock();
        let Some(entry) = entries.get_mut(key) else {
            return false;
        };
        if entry.is_live(now) {
            entry.expires_at = self.deadline(now);
            return true;
        }
        entries.remove(key);
        false
    }

    fn keys_at(&self, now: Instant) -> Vec<String> {
        let mut entries = self.lock();
        sweep(&mut entries, now);
        entries.keys().cloned().collect()
    }

    fn purge_expired_at(&self, now: Instant) -> usize {
        sweep(&mut self.lock(), now)
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.get_at(key, Instant::now())
    }

    fn set(&self, key: &str, value: Value) {
        self.set_at(key, value, Instant::now())
    }

    fn ttl(&self, key: &str) -> bool {
        self.ttl_at(key, Instant::now())
    }

    fn keys(&self) -> Vec<String> {
        self.keys_at(Instant::now())
    }

    fn del(&self, keys: &[String]) -> usize {
        let mut entries = self.lock();
        keys.iter().filter(|key| entries.remove(*key).is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TTL: Duration = Duration::from_secs(10);

    #[test]
    fn set_then_get() {
        let cache = MemoryCache::new(TTL);
        cache.set("k", json!(["a", "b"]));
        assert_eq!(cache.get("k"), Some(json!(["a", "b"])));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn entries_expire_after_ttl() {
        let cache = MemoryCache::new(TTL);
        let t0 = Instant::now();
        cache.set_at("k", json!(1), t0);
        assert_eq!(cache.get_at("k", t0 + Duration::from_secs(9)), Some(json!(1)));
        assert_eq!(cache.get_at("k", t0 + TTL), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn ttl_refresh_extends_expiry_without_rewrite() {
        let cache = MemoryCache::new(TTL);
        let t0 = Instant::now();
        cache.set_at("k", json!("v"), t0);
        assert!(cache.ttl_at("k", t0 + Duration::from_secs(8)));
        assert_eq!(
            cache.get_at("k", t0 + Duration::from_secs(15)),
            Some(json!("v"))
        );
        assert_eq!(cache.get_at("k", t0 + Duration::from_secs(18)), None);
    }

    #[test]
    fn ttl_on_missing_or_expired_key_is_false() {
        let cache = MemoryCache::new(TTL);
        let t0 = Instant::now();
        assert!(!cache.ttl_at("nope", t0));
        cache.set_at("k", json!(1), t0);
        assert!(!cache.ttl_at("k", t0 + TTL));
    }

    #[test]
    fn keys_skip_expired_entries() {
        let cache = MemoryCache::new(TTL);
        let t0 = Instant::now();
        cache.set_at("old", json!(1), t0);
        cache.set_at("new", json!(2), t0 + Duration::from_secs(5));
        let keys = cache.keys_at(t0 + Duration::from_secs(12));
        assert_eq!(keys, vec!["new".to_string()]);
    }

    #[test]
    fn del_counts_removed_keys() {
        let cache = MemoryCache::new(TTL);
        cache.set("a", json!(1));
        cache.set("b", json!(2));
        let removed = cache.del(&["a".into(), "b".into(), "c".into()]);
        assert_eq!(removed, 2);
        assert!(cache.keys().is_empty());
    }

    #[test]
    fn purge_expired_drops_only_dead_entries() {
        let cache = MemoryCache::new(TTL);
        let t0 = Instant::now();
        cache.set_at("dead", json!(1), t0);
        cache.set_at("alive", json!(2), t0 + Duration::from_secs(9));
        assert_eq!(cache.purge_expired_at(t0 + Duration::from_secs(11)), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn listing_keys_drops_expired_entries() {
        let cache = MemoryCache::new(TTL);
        let t0 = Instant::now();
        for i in 0..1000 {
            cache.set_at(&format!("purged-k{i}"), json!([]), t0);
        }
        let live = cache.keys_at(t0 + TTL);
        assert!(live.is_empty());
        assert_eq!(cache.del(&live), 0);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn writes_drop_expired_entries() {
        let cache = MemoryCache::new(TTL);
        let t0 = Instant::now();
        cache.set_at("old", json!(1), t0);
        cache.set_at("new", json!(2), t0 + Duration::from_secs(11));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_at("new", t0 + Duration::from_secs(11)), Some(json!(2)));
    }

    #[test]
    fn unrepresentable_ttl_never_expires() {
        let cache = MemoryCache::new(Duration::from_secs(i64::MAX as u64));
        cache.set("k", json!(1));
        assert!(cache.ttl("k"));
        assert_eq!(cache.get("k"), Some(json!(1)));
        assert_eq!(cache.keys(), vec!["k".to_string()]);

        let cache = MemoryCache::new(Duration::MAX);
        let t0 = Instant::now();
        cache.set_at("k", json!(2), t0);
        assert_eq!(cache.get_at("k", t0 + Duration::from_secs(86_400 * 365)), Some(json!(2)));
    }

    #[test]
    fn default_ttl_is_one_hour() {
        assert_eq!(MemoryCache::default().default_ttl(), Duration::from_secs(3600));
    }
}
