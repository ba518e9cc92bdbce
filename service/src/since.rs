//! Checkpointed incremental purge queries.

use purge_store::ChangesRequest;
use purge_types::{purged_record_id, RoleSet, Seq};
use serde::{Deserialize, Serialize};

use crate::checkpoint::read_checkpoint;
use crate::interpret::interpret_changes;
use crate::{PurgeError, PurgedDocs};

/// Options for [`PurgedDocs::get_purged_ids_since`].
#[derive(Clone, Debug, Default)]
pub struct SinceOptions {
    /// Checkpoint to resume from. The empty string is a valid identifier.
    pub checkpoint_id: String,
    /// Maximum number of feed entries to read; the configured default
    /// applies when unset.
    pub limit: Option<usize>,
}

impl SinceOptions {
    pub fn new(checkpoint_id: impl Into<String>) -> Self {
        Self {
            checkpoint_id: checkpoint_id.into(),
            limit: None,
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Purge changes found after a checkpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgedSince {
    pub purged_doc_ids: Vec<String>,
    /// Feed position to hand to [`PurgedDocs::write_checkpoint`] once the
    /// purges have been applied. Absent when no database was consulted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seq: Option<Seq>,
}

impl PurgedDocs {
    /// Which of `doc_ids` became purged after the stored checkpoint.
    ///
    /// The checkpoint is only read, never advanced: callers persist
    /// `last_seq` with [`PurgedDocs::write_checkpoint`] after acting on the
    /// result, so a crash in between replays rather than drops purges.
    pub async fn get_purged_ids_since(
        &self,
        roles: &RoleSet,
        doc_ids: &[String],
        options: SinceOptions,
    ) -> Result<PurgedSince, PurgeError> {
        if doc_ids.is_empty() || roles.is_empty() {
            return Ok(PurgedSince::default());
        }

        let db = self.purge_db(roles).await?;
        let checkpoint = read_checkpoint(db.as_ref(), &options.checkpoint_id).await?;
        let limit = options.limit.unwrap_or(self.config.since_limit);

        let request =
            ChangesRequest::for_ids(doc_ids.iter().map(|id| purged_record_id(id)).collect())
                .since(checkpoint.last_seq)
                .limit(limit);

        self.metrics.changes_queries.inc();
        let result = db.changes(request).await?;
        let purged_doc_ids = interpret_changes(Some(&result));
        tracing::debug!(
            db = db.name(),
            checkpoint = %options.checkpoint_id,
            purged = purged_doc_ids.len(),
            last_seq = %result.last_seq,
            "read purges since checkpoint"
        );

        Ok(PurgedSince {
            purged_doc_ids,
            last_seq: Some(result.last_seq),
        })
    }
}
