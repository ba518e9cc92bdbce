//! Service configuration with TOML file support.

use purge_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::PurgeError;

/// Configuration for the purge service.
///
/// Can be loaded from a TOML file via [`PurgeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PurgeConfig {
    /// Base name of the main database; purge databases are named
    /// `<db_name>-purged-role-<role hash>`.
    #[serde(default = "default_db_name")]
    pub db_name: String,

    /// Default cap on entries returned by an incremental purge query.
    #[serde(default = "default_since_limit")]
    pub since_limit: usize,

    /// ID prefix of purge-log documents on the global event log.
    #[serde(default = "default_purge_log_prefix")]
    pub purge_log_prefix: String,

    /// Time-to-live of cached snapshot results, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Pause between event-log resubscriptions, in milliseconds. Zero only
    /// yields to the scheduler.
    #[serde(default)]
    pub listener_restart_delay_ms: u64,

    /// Log format: "human" or "json". Applied by [`PurgeConfig::init_logging`].
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_db_name() -> String {
    "medic".to_string()
}

fn default_since_limit() -> usize {
    100
}

fn default_purge_log_prefix() -> String {
    "purgelog:".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    60 * 60
}

fn default_log_format() -> LogFormat {
    LogFormat::Human
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl PurgeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, PurgeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| PurgeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, PurgeError> {
        let config: Self = toml::from_str(s).map_err(|e| PurgeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, PurgeError> {
        toml::to_string_pretty(self).map_err(|e| PurgeError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), PurgeError> {
        if self.db_name.is_empty() {
            return Err(PurgeError::Config("db_name must not be empty".into()));
        }
        if self.since_limit == 0 {
            return Err(PurgeError::Config("since_limit must be positive".into()));
        }
        if self.purge_log_prefix.is_empty() {
            return Err(PurgeError::Config("purge_log_prefix must not be empty".into()));
        }
        Ok(())
    }

    /// Install the global tracing subscriber from `log_format` and
    /// `log_level`. Returns `false` if one was already installed.
    pub fn init_logging(&self) -> bool {
        purge_utils::init_logging(self.log_format, &self.log_level)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn listener_restart_delay(&self) -> Duration {
        Duration::from_millis(self.listener_restart_delay_ms)
    }
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            db_name: default_db_name(),
            since_limit: default_since_limit(),
            purge_log_prefix: default_purge_log_prefix(),
            cache_ttl_secs: default_cache_ttl_secs(),
            listener_restart_delay_ms: 0,
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
