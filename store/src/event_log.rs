//! The shared, append-only log of purge operations.

use async_trait::async_trait;
use purge_types::Seq;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::{RevisionRef, StoreError};

/// A change observed on the global event log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogChange {
    pub id: String,
    #[serde(default)]
    pub changes: Vec<RevisionRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<Seq>,
    #[serde(default)]
    pub deleted: bool,
}

impl LogChange {
    /// Revision of the first reported leaf, if any.
    pub fn first_rev(&self) -> Option<&str> {
        self.changes.first().map(|c| c.rev.as_str())
    }

    /// Whether the first reported revision is the document's initial one.
    pub fn is_first_revision(&self) -> bool {
        self.first_rev().is_some_and(|rev| rev.starts_with("1-"))
    }
}

/// Live feed of event-log changes. An `Err` item, or the sender hanging up,
/// ends the subscription.
pub type EventStream = mpsc::Receiver<Result<LogChange, StoreError>>;

#[async_trait]
pub trait EventLog: Send + Sync {
    /// Subscribe to changes made from now on.
    async fn subscribe(&self) -> Result<EventStream, StoreError>;
}
