//! Abstract collaborator traits for purge resolution.
//!
//! The purge service never talks to a concrete database or cache. Every
//! backend (a CouchDB client, the in-process TTL cache, in-memory nullables
//! for testing) implements these traits, and the rest of the workspace
//! depends only on them.

pub mod cache;
pub mod changes;
pub mod checkpoint;
pub mod db;
pub mod error;
pub mod event_log;

pub use cache::ResponseCache;
pub use changes::{ChangeEntry, ChangesRequest, ChangesResponse, RevisionRef};
pub use checkpoint::{CheckpointDoc, DbInfo};
pub use db::{DocumentServer, PurgeDb};
pub use error::StoreError;
pub use event_log::{EventLog, EventStream, LogChange};
