//! Prometheus metrics for the purge service.
//!
//! [`PurgeMetrics`] owns a dedicated [`Registry`] so an embedding HTTP layer
//! can expose it, or merge it into its own registry.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, Histogram, HistogramOpts, IntCounter, IntGauge,
    Opts, Registry, TextEncoder,
};

pub struct PurgeMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Snapshot queries answered from the response cache.
    pub cache_hits: IntCounter,
    /// Snapshot queries that had to consult a purge database.
    pub cache_misses: IntCounter,
    /// Change-feed queries issued against purge databases.
    pub changes_queries: IntCounter,
    /// Checkpoints persisted.
    pub checkpoint_writes: IntCounter,
    /// Full snapshot-cache invalidations.
    pub invalidations: IntCounter,
    /// Event-log resubscriptions after an error or a closed feed.
    pub listener_restarts: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Purge database handles held by the registry.
    pub purge_dbs: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Change-feed query latency, in milliseconds.
    pub changes_query_ms: Histogram,
}

impl PurgeMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let cache_hits = register_int_counter_with_registry!(
            Opts::new("purge_cache_hits_total", "Snapshot queries served from cache"),
            registry
        )
        .expect("failed to register cache_hits counter");

        let cache_misses = register_int_counter_with_registry!(
            Opts::new(
                "purge_cache_misses_total",
                "Snapshot queries that missed the cache"
            ),
            registry
        )
        .expect("failed to register cache_misses counter");

        let changes_queries = register_int_counter_with_registry!(
            Opts::new(
                "purge_changes_queries_total",
                "Change-feed queries issued against purge databases"
            ),
            registry
        )
        .expect("failed to register changes_queries counter");

        let checkpoint_writes = register_int_counter_with_registry!(
            Opts::new("purge_checkpoint_writes_total", "Checkpoints persisted"),
            registry
        )
        .expect("failed to register checkpoint_writes counter");

        let invalidations = register_int_counter_with_registry!(
            Opts::new(
                "purge_cache_invalidations_total",
                "Full snapshot-cache invalidations"
            ),
            registry
        )
        .expect("failed to register invalidations counter");

        let listener_restarts = register_int_counter_with_registry!(
            Opts::new(
                "purge_listener_restarts_total",
                "Event-log subscription restarts"
            ),
            registry
        )
        .expect("failed to register listener_restarts counter");

        let purge_dbs = register_int_gauge_with_registry!(
            Opts::new("purge_dbs", "Purge database handles held open"),
            registry
        )
        .expect("failed to register purge_dbs gauge");

        // 0.1 ms → ~1.6 s
        let changes_query_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "purge_changes_query_ms",
                "Change-feed query latency in milliseconds"
            )
            .buckets(prometheus::exponential_buckets(0.1, 2.0, 15).unwrap_or_default()),
            registry
        )
        .expect("failed to register changes_query_ms histogram");

        Self {
            registry,
            cache_hits,
            cache_misses,
            changes_queries,
            checkpoint_writes,
            invalidations,
            listener_restarts,
            purge_dbs,
            changes_query_ms,
        }
    }

    /// Encode every metric in the Prometheus text exposition format.
    pub fn encode(&self) -> String {
        let mut buf = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buf) {
            tracing::warn!("failed to encode metrics: {e}");
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}

impl Default for PurgeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let metrics = PurgeMetrics::new();
        assert_eq!(metrics.cache_hits.get(), 0);
        assert_eq!(metrics.listener_restarts.get(), 0);
        assert_eq!(metrics.purge_dbs.get(), 0);
    }

    #[test]
    fn independent_instances_do_not_share_state() {
        let a = PurgeMetrics::new();
        let b = PurgeMetrics::new();
        a.invalidations.inc();
        assert_eq!(a.invalidations.get(), 1);
        assert_eq!(b.invalidations.get(), 0);
    }

    #[test]
    fn encode_exposes_metric_names() {
        let metrics = PurgeMetrics::new();
        metrics.listener_restarts.inc();
        let text = metrics.encode();
        assert!(text.contains("purge_listener_restarts_total 1"));
        assert!(text.contains("purge_cache_hits_total"));
    }
}
