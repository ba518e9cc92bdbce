//! Document server and per-role purge database traits.

use async_trait::async_trait;
use std::sync::Arc;

use crate::{ChangesRequest, ChangesResponse, CheckpointDoc, DbInfo, StoreError};

/// A document server that hosts one purge database per role hash.
#[async_trait]
pub trait DocumentServer: Send + Sync {
    /// Open the named database, creating it if it does not exist.
    async fn open_or_create(&self, name: &str) -> Result<Arc<dyn PurgeDb>, StoreError>;
}

/// Handle to a single purge database.
#[async_trait]
pub trait PurgeDb: Send + Sync {
    fn name(&self) -> &str;

    /// Run a bounded, non-live change-feed query.
    async fn changes(&self, request: ChangesRequest) -> Result<ChangesResponse, StoreError>;

    /// Read a checkpoint document by its full `_local/…` ID.
    ///
    /// Fails with [`StoreError::NotFound`] when the document does not exist.
    async fn get_checkpoint(&self, doc_id: &str) -> Result<CheckpointDoc, StoreError>;

    /// Create or overwrite a checkpoint document. Returns the new revision.
    async fn put_checkpoint(&self, doc: &CheckpointDoc) -> Result<String, StoreError>;

    /// Current database metadata, including the update sequence.
    async fn info(&self) -> Result<DbInfo, StoreError>;
}
