//! Checkpoint documents and database metadata.

use purge_types::{checkpoint_doc_id, Seq};
use serde::{Deserialize, Serialize};

/// A persisted high-water mark for one incremental purge consumer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointDoc {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(default)]
    pub last_seq: Seq,
}

impl CheckpointDoc {
    /// A fresh, not-yet-persisted checkpoint positioned at the start of the feed.
    pub fn zero(checkpoint_id: &str) -> Self {
        Self {
            id: checkpoint_doc_id(checkpoint_id),
            rev: None,
            last_seq: Seq::ZERO,
        }
    }
}

/// Database metadata as reported by `info()`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbInfo {
    #[serde(default)]
    pub db_name: String,
    pub update_seq: Seq,
    #[serde(default)]
    pub doc_count: u64,
}
