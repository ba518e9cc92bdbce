//! Purge resolution engine.
//!
//! For each distinct set of access roles, a dedicated purge database records
//! which documents are hidden from that role set's replica. This crate
//! answers two questions against those databases:
//!
//! - [`PurgedDocs::get_purged_ids`] — which of these documents are purged
//!   right now (cached per exact query).
//! - [`PurgedDocs::get_purged_ids_since`] — which of these documents were
//!   purged after a saved checkpoint, advanced separately with
//!   [`PurgedDocs::write_checkpoint`].
//!
//! [`PurgedDocs::init`] starts the task that flushes cached snapshots when
//! new purges are logged.

pub mod cache_key;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod interpret;
pub mod invalidator;
pub mod metrics;
pub mod registry;
pub mod service;
pub mod since;
pub mod snapshot;

pub use cache_key::{cache_key, is_snapshot_cache_key, CACHE_KEY_PREFIX};
pub use config::PurgeConfig;
pub use error::PurgeError;
pub use interpret::{classify, interpret_changes, interpret_raw};
pub use invalidator::{is_invalidating_change, InvalidatorHandle};
pub use metrics::PurgeMetrics;
pub use purge_types::{CheckpointTarget, PurgeStatus, RoleSet, Seq};
pub use registry::PurgeDbRegistry;
pub use service::PurgedDocs;
pub use since::{PurgedSince, SinceOptions};
