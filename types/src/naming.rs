//! Naming conventions for purge databases, purge records and checkpoints.

/// Prefix that turns a document ID into its purge-record ID.
pub const PURGED_ID_PREFIX: &str = "purged:";

/// ID prefix of checkpoint documents (local, non-replicated documents).
pub const CHECKPOINT_PREFIX: &str = "_local/";

/// Name of the purge database for a role hash, e.g. `medic-purged-role-<hash>`.
pub fn purge_db_name(base: &str, role_hash: &str) -> String {
    format!("{base}-purged-role-{role_hash}")
}

/// Derive the purge-record ID of a document.
pub fn purged_record_id(doc_id: &str) -> String {
    format!("{PURGED_ID_PREFIX}{doc_id}")
}

/// Recover the real document ID from a purge-record ID.
///
/// Inverse of [`purged_record_id`]. IDs without the prefix come back unchanged.
pub fn extract_real_id(record_id: &str) -> String {
    record_id
        .strip_prefix(PURGED_ID_PREFIX)
        .unwrap_or(record_id)
        .to_string()
}

/// Document ID under which a checkpoint is stored in a purge database.
pub fn checkpoint_doc_id(checkpoint_id: &str) -> String {
    format!("{CHECKPOINT_PREFIX}{checkpoint_id}")
}
