//! Event-driven invalidation of the snapshot cache.
//!
//! A supervised task follows the global event log. Whenever a purge-log
//! document is created, every snapshot cache entry is flushed: one purge
//! operation can touch any number of role sets and ID lists, so a
//! selective flush is not attempted.
//!
//! The subscription is restarted forever, without giving up, whenever it
//! fails or closes. Each restart resumes from "now", so events that happen
//! while disconnected are missed; affected entries stay stale until their
//! TTL runs out. Restarts are counted in
//! [`PurgeMetrics::listener_restarts`](crate::PurgeMetrics).

use purge_store::{LogChange, StoreError};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::cache_key::is_snapshot_cache_key;
use crate::PurgedDocs;

/// Whether an event-log change is the creation of a purge-log document.
pub fn is_invalidating_change(change: &LogChange, purge_log_prefix: &str) -> bool {
    change.id.starts_with(purge_log_prefix) && change.is_first_revision()
}

/// Handle to the running invalidator task.
///
/// Dropping the handle detaches the task; it keeps running for the life of
/// the runtime.
pub struct InvalidatorHandle {
    docs: Arc<PurgedDocs>,
    shutdown: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl InvalidatorHandle {
    /// Number of times the event-log subscription has been restarted.
    pub fn restarts(&self) -> u64 {
        self.docs.metrics.listener_restarts.get()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the task and wait for it to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            tracing::warn!("purge cache invalidator ended abnormally: {e}");
        }
    }
}

impl PurgedDocs {
    /// Start the cache invalidator.
    ///
    /// Only the first call on an instance starts a task; later calls return
    /// `None`. Must be called from within a Tokio runtime.
    pub fn init(self: &Arc<Self>) -> Option<InvalidatorHandle> {
        if self.listener_started.swap(true, Ordering::SeqCst) {
            return None;
        }

        let (shutdown, shutdown_rx) = broadcast::channel(1);
        let docs = Arc::clone(self);
        let task = tokio::spawn(async move { docs.run_invalidator(shutdown_rx).await });
        tracing::info!("purge cache invalidator started");

        Some(InvalidatorHandle {
            docs: Arc::clone(self),
            shutdown,
            task,
        })
    }

    /// Whether [`PurgedDocs::init`] has started the invalidator.
    pub fn is_listening(&self) -> bool {
        self.listener_started.load(Ordering::SeqCst)
    }

    /// Flush every snapshot cache entry. Returns how many were removed.
    pub fn clear_cache(&self) -> usize {
        self.metrics.invalidations.inc();
        let keys: Vec<String> = self
            .cache
            .keys()
            .into_iter()
            .filter(|key| is_snapshot_cache_key(key))
            .collect();
        if keys.is_empty() {
            return 0;
        }
        self.cache.del(&keys)
    }

    async fn run_invalidator(&self, mut shutdown: broadcast::Receiver<()>) {
        let delay = self.config.listener_restart_delay();
        loop {
            let outcome = tokio::select! {
                biased;
                Ok(()) = shutdown.recv() => {
                    tracing::debug!("purge cache invalidator shutting down");
                    return;
                }
                outcome = self.follow_event_log() => outcome,
            };

            self.metrics.listener_restarts.inc();
            let restarts = self.metrics.listener_restarts.get();
            match outcome {
                Ok(()) => tracing::warn!(restarts, "event log feed closed, restarting"),
                Err(e) => {
                    tracing::error!(restarts, "error watching event log changes, restarting: {e}")
                }
            }

            if delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::select! {
                    biased;
                    Ok(()) = shutdown.recv() => {
                        tracing::debug!("purge cache invalidator shutting down");
                        return;
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }
    }

    /// Follow one subscription until it ends. `Ok` means the feed closed
    /// without reporting an error.
    async fn follow_event_log(&self) -> Result<(), StoreError> {
        let mut stream = self.event_log.subscribe().await?;
        while let Some(item) = stream.recv().await {
            let change = item?;
            if is_invalidating_change(&change, &self.config.purge_log_prefix) {
                let cleared = self.clear_cache();
                tracing::debug!(id = %change.id, keys = cleared, "purge logged, cleared purge cache");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use purge_store::RevisionRef;

    fn change(id: &str, rev: &str) -> LogChange {
        LogChange {
            id: id.into(),
            changes: vec![RevisionRef { rev: rev.into() }],
            seq: None,
            deleted: false,
        }
    }

    #[test]
    fn created_purge_log_invalidates() {
        assert!(is_invalidating_change(&change("purgelog:abc", "1-x"), "purgelog:"));
    }

    #[test]
    fn edited_purge_log_does_not_invalidate() {
        assert!(!is_invalidating_change(&change("purgelog:abc", "2-x"), "purgelog:"));
    }

    #[test]
    fn other_documents_do_not_invalidate() {
        assert!(!is_invalidating_change(&change("report-1", "1-x"), "purgelog:"));
        assert!(!is_invalidating_change(&change("xpurgelog:1", "1-x"), "purgelog:"));
    }

    #[test]
    fn change_without_revisions_does_not_invalidate() {
        let c = LogChange {
            id: "purgelog:abc".into(),
            changes: vec![],
            seq: None,
            deleted: false,
        };
        assert!(!is_invalidating_change(&c, "purgelog:"));
    }
}
