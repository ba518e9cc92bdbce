//! The purge service: one long-lived instance owns every piece of shared
//! state (purge database registry, response cache, listener flag, metrics).

use purge_cache::MemoryCache;
use purge_store::{DocumentServer, EventLog, PurgeDb, ResponseCache};
use purge_types::RoleSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::{PurgeConfig, PurgeDbRegistry, PurgeError, PurgeMetrics};

/// Answers "which of these documents are purged for this role set?".
pub struct PurgedDocs {
    pub(crate) config: PurgeConfig,
    pub(crate) registry: PurgeDbRegistry,
    pub(crate) cache: Arc<dyn ResponseCache>,
    pub(crate) event_log: Arc<dyn EventLog>,
    pub(crate) metrics: Arc<PurgeMetrics>,
    pub(crate) listener_started: AtomicBool,
}

impl PurgedDocs {
    pub fn new(
        config: PurgeConfig,
        server: Arc<dyn DocumentServer>,
        cache: Arc<dyn ResponseCache>,
        event_log: Arc<dyn EventLog>,
    ) -> Self {
        Self::with_metrics(config, server, cache, event_log, Arc::new(PurgeMetrics::new()))
    }

    /// Build a service whose response cache is an in-process [`MemoryCache`]
    /// using the configured TTL.
    pub fn with_memory_cache(
        config: PurgeConfig,
        server: Arc<dyn DocumentServer>,
        event_log: Arc<dyn EventLog>,
    ) -> Self {
        let cache = Arc::new(MemoryCache::new(config.cache_ttl()));
        Self::new(config, server, cache, event_log)
    }

    pub fn with_metrics(
        config: PurgeConfig,
        server: Arc<dyn DocumentServer>,
        cache: Arc<dyn ResponseCache>,
        event_log: Arc<dyn EventLog>,
        metrics: Arc<PurgeMetrics>,
    ) -> Self {
        let registry = PurgeDbRegistry::new(server, config.db_name.clone());
        Self {
            config,
            registry,
            cache,
            event_log,
            metrics,
            listener_started: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &PurgeConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<PurgeMetrics> {
        &self.metrics
    }

    /// The purge database dedicated to `roles`.
    pub async fn purge_db(&self, roles: &RoleSet) -> Result<Arc<dyn PurgeDb>, PurgeError> {
        let db = self.registry.resolve(roles).await?;
        self.metrics.purge_dbs.set(self.registry.len() as i64);
        Ok(db)
    }

    /// Number of purge databases opened so far.
    pub fn registered_dbs(&self) -> usize {
        self.registry.len()
    }
}
