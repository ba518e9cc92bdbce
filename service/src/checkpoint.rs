//! Checkpoint reads and writes.

use purge_store::{CheckpointDoc, PurgeDb, StoreError};
use purge_types::{checkpoint_doc_id, CheckpointTarget, RoleSet, Seq};

use crate::{PurgeError, PurgedDocs};

/// Read a checkpoint, substituting a zero checkpoint when none is stored.
/// Nothing is written.
pub(crate) async fn read_checkpoint(
    db: &dyn PurgeDb,
    checkpoint_id: &str,
) -> Result<CheckpointDoc, StoreError> {
    match db.get_checkpoint(&checkpoint_doc_id(checkpoint_id)).await {
        Ok(doc) => Ok(doc),
        Err(e) if e.is_not_found() => Ok(CheckpointDoc::zero(checkpoint_id)),
        Err(e) => Err(e),
    }
}

impl PurgedDocs {
    /// Move a checkpoint to `target` and persist it. Returns the stored
    /// position.
    ///
    /// Writers to the same checkpoint are not serialized here; the last
    /// successful write wins.
    pub async fn write_checkpoint(
        &self,
        roles: &RoleSet,
        checkpoint_id: &str,
        target: CheckpointTarget,
    ) -> Result<Seq, PurgeError> {
        let db = self.purge_db(roles).await?;

        let (checkpoint, info) = tokio::join!(read_checkpoint(db.as_ref(), checkpoint_id), db.info());
        let mut checkpoint = checkpoint?;
        let info = info?;

        checkpoint.last_seq = match target {
            CheckpointTarget::Now => info.update_seq,
            CheckpointTarget::At(seq) => seq,
        };
        db.put_checkpoint(&checkpoint).await?;
        self.metrics.checkpoint_writes.inc();

        tracing::debug!(
            db = db.name(),
            checkpoint = %checkpoint_id,
            last_seq = %checkpoint.last_seq,
            "checkpoint written"
        );
        Ok(checkpoint.last_seq)
    }
}
