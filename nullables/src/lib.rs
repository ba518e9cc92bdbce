//! Nullable infrastructure for deterministic testing.
//!
//! Every collaborator of the purge service (document server, purge
//! databases, response cache, global event log) is abstracted behind a trait
//! in `purge-store`. This crate provides test-friendly implementations that:
//! - Keep all state in memory and never touch the network
//! - Record every call so tests can assert on side effects
//! - Can be told to fail, to exercise error paths
//!
//! Usage: swap real implementations for nullables in tests.

pub mod cache;
pub mod event_log;
pub mod store;

pub use cache::NullResponseCache;
pub use event_log::NullEventLog;
pub use store::{NullDocumentServer, NullPurgeDb};
