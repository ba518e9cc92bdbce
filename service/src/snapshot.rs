//! Snapshot purge queries, backed by the response cache.

use purge_store::ChangesRequest;
use purge_types::{purged_record_id, RoleSet};
use std::time::Instant;

use crate::cache_key::cache_key;
use crate::interpret::interpret_changes;
use crate::{PurgeError, PurgedDocs};

impl PurgedDocs {
    /// Which of `doc_ids` are currently purged for `roles`.
    ///
    /// Results are cached per exact (role set, ID list) pair. A hit refreshes
    /// the entry's TTL; a miss queries the change feed of the role set's
    /// purge database for exactly the candidate IDs. Nothing is cached when
    /// the query fails.
    pub async fn get_purged_ids(
        &self,
        roles: &RoleSet,
        doc_ids: &[String],
    ) -> Result<Vec<String>, PurgeError> {
        if doc_ids.is_empty() || roles.is_empty() {
            return Ok(Vec::new());
        }

        let key = cache_key(roles, doc_ids);
        if let Some(cached) = self.cache.get(&key) {
            match serde_json::from_value::<Vec<String>>(cached) {
                Ok(purged) => {
                    self.cache.ttl(&key);
                    self.metrics.cache_hits.inc();
                    return Ok(purged);
                }
                Err(e) => tracing::warn!(key = %key, "discarding undecodable cache entry: {e}"),
            }
        }
        self.metrics.cache_misses.inc();

        let db = self.purge_db(roles).await?;
        let request =
            ChangesRequest::for_ids(doc_ids.iter().map(|id| purged_record_id(id)).collect());

        self.metrics.changes_queries.inc();
        let started = Instant::now();
        let result = db.changes(request).await?;
        self.metrics
            .changes_query_ms
            .observe(started.elapsed().as_secs_f64() * 1000.0);

        let purged = interpret_changes(Some(&result));
        tracing::trace!(
            db = db.name(),
            candidates = doc_ids.len(),
            purged = purged.len(),
            "resolved purge snapshot"
        );
        self.cache.set(&key, serde_json::to_value(&purged)?);
        Ok(purged)
    }
}
