//! Snapshot cache key naming.
//!
//! Keys look like `purged-<roles JSON>-<ids digest>`, which lets the
//! invalidator find every snapshot entry by pattern without tracking them.

use purge_types::{digest_hex, RoleSet};
use regex::Regex;
use std::sync::OnceLock;

pub const CACHE_KEY_PREFIX: &str = "purged-";

fn snapshot_key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^purged-.+-.+$").expect("valid snapshot key pattern"))
}

/// Cache key for one exact (role set, document ID list) query.
///
/// The digest covers the ID list as given, so the same IDs in a different
/// order produce a different key.
pub fn cache_key(roles: &RoleSet, doc_ids: &[String]) -> String {
    let ids_json = serde_json::to_string(doc_ids).unwrap_or_default();
    format!(
        "{CACHE_KEY_PREFIX}{}-{}",
        roles.to_json(),
        digest_hex(ids_json.as_bytes())
    )
}

/// Whether `key` names a snapshot cache entry.
pub fn is_snapshot_cache_key(key: &str) -> bool {
    snapshot_key_pattern().is_match(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn key_shape() {
        let key = cache_key(&RoleSet::new(["b", "a"]), &ids(&["x"]));
        assert!(key.starts_with(r#"purged-["a","b"]-"#));
        assert!(is_snapshot_cache_key(&key));
    }

    #[test]
    fn set_equal_roles_share_keys() {
        let d = ids(&["x", "y"]);
        assert_eq!(
            cache_key(&RoleSet::new(["a", "b"]), &d),
            cache_key(&RoleSet::new(["b", "a"]), &d)
        );
    }

    #[test]
    fn id_order_matters() {
        let roles = RoleSet::new(["a"]);
        assert_ne!(
            cache_key(&roles, &ids(&["x", "y"])),
            cache_key(&roles, &ids(&["y", "x"]))
        );
    }

    #[test]
    fn unrelated_keys_do_not_match() {
        assert!(!is_snapshot_cache_key("purged-"));
        assert!(!is_snapshot_cache_key("purged-only"));
        assert!(!is_snapshot_cache_key("user-settings-abc"));
        assert!(!is_snapshot_cache_key("xpurged-a-b"));
    }
}
