//! Purge status of a document for one role set.

use serde::{Deserialize, Serialize};

/// Whether a document is currently hidden from a role set's replica.
///
/// A purge record that exists means [`PurgeStatus::Purged`]. A purge record
/// that the change feed reports as deleted means the document was purged and
/// has since been restored: [`PurgeStatus::Unpurged`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PurgeStatus {
    Purged,
    Unpurged,
}

impl PurgeStatus {
    /// Map a change-feed `deleted` flag onto a status.
    pub fn from_deleted(deleted: bool) -> Self {
        if deleted {
            Self::Unpurged
        } else {
            Self::Purged
        }
    }

    pub fn is_purged(&self) -> bool {
        matches!(self, Self::Purged)
    }
}
