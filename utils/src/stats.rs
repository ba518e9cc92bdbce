//! Named call counters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

/// A thread-safe collection of named counters.
///
/// Counters are created on first use, so callers can count arbitrary
/// operation names without declaring them up front.
#[derive(Default)]
pub struct CallStats {
    counters: RwLock<HashMap<String, AtomicU64>>,
    order: Mutex<Vec<String>>,
}

impl CallStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self, name: &str) {
        self.add(name, 1);
    }

    pub fn add(&self, name: &str, value: u64) {
        if let Some(counter) = self.read().get(name) {
            counter.fetch_add(value, Ordering::Relaxed);
            return;
        }
        let mut counters = self.counters.write().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| {
                self.order
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push(name.to_string());
                AtomicU64::new(0)
            })
            .fetch_add(value, Ordering::Relaxed);
    }

    pub fn get(&self, name: &str) -> u64 {
        self.read()
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Counter values in the order their names were first seen.
    pub fn snapshot(&self) -> Vec<(String, u64)> {
        let counters = self.read();
        self.order
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|name| {
                let value = counters
                    .get(name)
                    .map(|c| c.load(Ordering::Relaxed))
                    .unwrap_or(0);
                (name.clone(), value)
            })
            .collect()
    }

    pub fn reset(&self) {
        for counter in self.read().values() {
            counter.store(0, Ordering::Relaxed);
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, AtomicU64>> {
        self.counters.read().unwrap_or_else(|e| e.into_inner())
    }
}
