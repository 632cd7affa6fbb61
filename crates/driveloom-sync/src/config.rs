//! Synchronizer configuration (grounded on `driveloom-indexing::config::WorkerConfig`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How stale a folder's last sync must be before a caller's interaction
/// triggers a fresh one (`spec.md` §4.I "older than a configurable
/// interval (default 1 hour)").
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(60 * 60);

/// Starting delay for drive rate-limit backoff; doubles per attempt.
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(500);

pub const DEFAULT_MAX_BACKOFF_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_stale_after_secs")]
    pub stale_after_secs: u64,
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    #[serde(default = "default_max_backoff_attempts")]
    pub max_backoff_attempts: u32,
}

fn default_stale_after_secs() -> u64 {
    DEFAULT_STALE_AFTER.as_secs()
}

fn default_backoff_base_ms() -> u64 {
    DEFAULT_BACKOFF_BASE.as_millis() as u64
}

fn default_max_backoff_attempts() -> u32 {
    DEFAULT_MAX_BACKOFF_ATTEMPTS
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            stale_after_secs: default_stale_after_secs(),
            backoff_base_ms: default_backoff_base_ms(),
            max_backoff_attempts: default_max_backoff_attempts(),
        }
    }
}

impl SyncConfig {
    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    /// Exponential backoff delay for the given zero-based attempt number.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_base() * 2u32.saturating_pow(attempt)
    }

    /// Whether a folder's last sync is stale enough to warrant a fresh
    /// pass (`spec.md` §4.I).
    pub fn is_stale(&self, last_synced_at: Option<jiff::Timestamp>) -> bool {
        let Some(last_synced_at) = last_synced_at else { return true };
        let elapsed_seconds = jiff::Timestamp::now().as_second() - last_synced_at.as_second();
        elapsed_seconds.max(0) as u64 >= self.stale_after_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_synced_folder_is_stale() {
        assert!(SyncConfig::default().is_stale(None));
    }

    #[test]
    fn recently_synced_folder_is_not_stale() {
        assert!(!SyncConfig::default().is_stale(Some(jiff::Timestamp::now())));
    }

    #[test]
    fn backoff_delay_doubles_per_attempt() {
        let config = SyncConfig::default();
        assert_eq!(config.backoff_delay(0), config.backoff_base());
        assert_eq!(config.backoff_delay(1), config.backoff_base() * 2);
        assert_eq!(config.backoff_delay(2), config.backoff_base() * 4);
    }
}
