//! Fundamental types for purge resolution.
//!
//! This crate defines the vocabulary shared by every other crate in the
//! workspace: canonical role sets and their hashes, the naming of per-role
//! purge databases, purge-record ID derivation, change-feed sequences, and the
//! explicit purged/unpurged status of a document.

pub mod hash;
pub mod naming;
pub mod role;
pub mod seq;
pub mod status;

pub use hash::{blake2b_256, digest_hex};
pub use naming::{
    checkpoint_doc_id, extract_real_id, purge_db_name, purged_record_id, CHECKPOINT_PREFIX,
    PURGED_ID_PREFIX,
};
pub use role::RoleSet;
pub use seq::{CheckpointTarget, Seq};
pub use status::PurgeStatus;
