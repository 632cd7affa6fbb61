//! Worker configuration (grounded on `nvisy-worker::service::config::WorkerConfig`).

use std::time::Duration;

use driveloom_postgres::PgConfig;
use serde::{Deserialize, Serialize};

/// Default maximum concurrent jobs per worker (`spec.md` §4.F "tuned for
/// I/O-bound work (nominally 20)").
pub const DEFAULT_MAX_CONCURRENT_JOBS: usize = 20;

/// How long an executor sleeps after finding no claimable job.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Complete indexing worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub postgres: PgConfig,
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Whether the context augmenter (`spec.md` §4.E) runs before chunk
    /// embedding. Disabled by default since it costs one generator call
    /// per long chunk.
    #[serde(default)]
    pub contextual_chunking_enabled: bool,
}

fn default_max_concurrent_jobs() -> usize {
    DEFAULT_MAX_CONCURRENT_JOBS
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

impl WorkerConfig {
    pub fn new(postgres: PgConfig) -> Self {
        Self {
            postgres,
            max_concurrent_jobs: DEFAULT_MAX_CONCURRENT_JOBS,
            poll_interval_ms: default_poll_interval_ms(),
            contextual_chunking_enabled: false,
        }
    }

    pub fn with_max_concurrent_jobs(mut self, max_concurrent_jobs: usize) -> Self {
        self.max_concurrent_jobs = max_concurrent_jobs;
        self
    }

    pub fn with_contextual_chunking_enabled(mut self, enabled: bool) -> Self {
        self.contextual_chunking_enabled = enabled;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
