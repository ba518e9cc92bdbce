//! Nullable event log — push changes into live subscriptions by hand.

use async_trait::async_trait;
use purge_store::{EventLog, EventStream, LogChange, RevisionRef, StoreError};
use std::sync::Mutex;
use tokio::sync::{mpsc, watch};

const SUBSCRIPTION_BUFFER: usize = 64;

/// A controllable global event log for testing.
///
/// Subscriptions only see changes emitted after they were opened, matching a
/// live feed that starts at "now".
pub struct NullEventLog {
    subscribers: Mutex<Vec<mpsc::Sender<Result<LogChange, StoreError>>>>,
    failing_subscribes: Mutex<u32>,
    subscribe_count: watch::Sender<u64>,
}

impl NullEventLog {
    pub fn new() -> Self {
        let (subscribe_count, _) = watch::channel(0);
        Self {
            subscribers: Mutex::new(Vec::new()),
            failing_subscribes: Mutex::new(0),
            subscribe_count,
        }
    }

    /// Deliver a change to every open subscription. Returns how many
    /// subscriptions received it.
    pub fn emit(&self, change: LogChange) -> usize {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers
            .iter()
            .filter(|tx| tx.try_send(Ok(change.clone())).is_ok())
            .count()
    }

    /// Emit a change for `id` whose first leaf revision is `rev`.
    pub fn emit_rev(&self, id: &str, rev: &str) -> usize {
        self.emit(LogChange {
            id: id.to_string(),
            changes: vec![RevisionRef {
                rev: rev.to_string(),
            }],
            seq: None,
            deleted: false,
        })
    }

    /// Break every open subscription with an error item.
    pub fn fail_subscriptions(&self, reason: &str) {
        let subscribers = std::mem::take(&mut *self.subscribers.lock().unwrap());
        for tx in subscribers {
            let _ = tx.try_send(Err(StoreError::Unavailable(reason.to_string())));
        }
    }

    /// Close every open subscription without an error.
    pub fn close_subscriptions(&self) {
        self.subscribers.lock().unwrap().clear();
    }

    /// Make the next `n` calls to `subscribe` fail.
    pub fn fail_next_subscribes(&self, n: u32) {
        *self.failing_subscribes.lock().unwrap() = n;
    }

    /// Total `subscribe` calls, successful or not.
    pub fn subscribe_calls(&self) -> u64 {
        *self.subscribe_count.borrow()
    }

    /// Number of subscriptions currently open.
    pub fn open_subscriptions(&self) -> usize {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }

    /// Wait until `subscribe` has been called at least `n` times.
    pub async fn wait_for_subscribe_calls(&self, n: u64) {
        let mut rx = self.subscribe_count.subscribe();
        let _ = rx.wait_for(|count| *count >= n).await;
    }
}

impl Default for NullEventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventLog for NullEventLog {
    async fn subscribe(&self) -> Result<EventStream, StoreError> {
        let result = {
            let mut failing = self.failing_subscribes.lock().unwrap();
            if *failing > 0 {
                *failing -= 1;
                Err(StoreError::Unavailable("event log subscription refused".into()))
            } else {
                let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
                self.subscribers.lock().unwrap().push(tx);
                Ok(rx)
            }
        };
        self.subscribe_count.send_modify(|count| *count += 1);
        result
    }
}
