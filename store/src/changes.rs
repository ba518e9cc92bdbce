//! Change-feed request and response shapes.

use purge_types::{PurgeStatus, Seq};
use serde::{Deserialize, Serialize};

/// A bounded, non-live change-feed query scoped to a set of document IDs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangesRequest {
    pub doc_ids: Vec<String>,
    pub batch_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<Seq>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    pub seq_interval: usize,
}

impl ChangesRequest {
    /// Query exactly `doc_ids`, sized so the whole answer fits one batch.
    ///
    /// `batch_size` and `seq_interval` are server tuning knobs; they do not
    /// change which entries come back.
    pub fn for_ids(doc_ids: Vec<String>) -> Self {
        let count = doc_ids.len();
        Self {
            doc_ids,
            batch_size: count + 1,
            since: None,
            limit: None,
            seq_interval: count,
        }
    }

    /// Only report changes strictly after `since`.
    pub fn since(mut self, since: Seq) -> Self {
        self.since = Some(since);
        self
    }

    /// Cap the number of reported entries.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One revision reference inside a change entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRef {
    pub rev: String,
}

/// A single document-level entry of a change feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub id: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub changes: Vec<RevisionRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<Seq>,
}

impl ChangeEntry {
    /// Purge status signalled by this entry's presence or deletion.
    pub fn status(&self) -> PurgeStatus {
        PurgeStatus::from_deleted(self.deleted)
    }
}

/// The result of a bounded change-feed query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangesResponse {
    #[serde(default)]
    pub results: Vec<ChangeEntry>,
    #[serde(default)]
    pub last_seq: Seq,
}
