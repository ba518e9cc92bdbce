//! Change-feed interpretation.
//!
//! A purge record that exists means its document is purged; a purge record
//! reported as deleted means the document was restored. Everything below
//! goes through [`PurgeStatus`] so the flag is read in exactly one place.

use purge_store::{ChangeEntry, ChangesResponse};
use purge_types::{extract_real_id, PurgeStatus};
use serde::Deserialize;
use serde_json::Value;

/// Real document ID and purge status carried by one change entry.
pub fn classify(entry: &ChangeEntry) -> (String, PurgeStatus) {
    (extract_real_id(&entry.id), entry.status())
}

/// Real IDs of every purged document in `result`, in feed order.
///
/// A missing result yields no IDs.
pub fn interpret_changes(result: Option<&ChangesResponse>) -> Vec<String> {
    let Some(result) = result else {
        return Vec::new();
    };
    result
        .results
        .iter()
        .map(classify)
        .filter_map(|(id, status)| status.is_purged().then_some(id))
        .collect()
}

/// Like [`interpret_changes`], for a raw change-feed body. Anything that
/// does not decode as a change-feed result yields no IDs.
pub fn interpret_raw(body: &Value) -> Vec<String> {
    match ChangesResponse::deserialize(body) {
        Ok(result) => interpret_changes(Some(&result)),
        Err(e) => {
            tracing::debug!("ignoring malformed change-feed result: {e}");
            Vec::new()
        }
    }
}
