//! Indexing job entity (`spec.md` §3 "Indexing job").

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default maximum attempts for an indexing job (`spec.md` §3).
pub const DEFAULT_MAX_ATTEMPTS: i32 = 3;

/// Lifecycle state of an indexing job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// A unit of re-indexing work for one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingJob {
    pub id: Uuid,
    /// At most one live job per file (`spec.md` §3, enforced by storage).
    pub file_id: Uuid,
    pub folder_id: Uuid,
    pub status: JobStatus,
    /// Larger runs sooner.
    pub priority: i32,
    pub attempts: i32,
    pub max_attempts: i32,
    pub last_error: Option<String>,
    /// When a retried job becomes eligible to be claimed again
    /// (`SPEC_FULL.md` §3 backoff scheduling).
    pub next_attempt_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}

impl IndexingJob {
    /// Whether another attempt is permitted after this one fails.
    pub fn has_attempts_remaining(&self) -> bool {
        self.attempts < self.max_attempts
    }

    /// Exponential backoff delay before the next attempt, capped at 10
    /// minutes, matching the indexing worker's retry policy
    /// (`spec.md` §4.F).
    pub fn backoff_delay(&self) -> jiff::SignedDuration {
        let exponent = self.attempts.clamp(0, 6) as u32;
        let seconds = 2u64.saturating_pow(exponent).min(600);
        jiff::SignedDuration::from_secs(seconds as i64)
    }
}

/// Outcome reported to the storage layer's `complete_job` when a job
/// finishes an attempt (`spec.md` §4.A).
#[derive(Debug, Clone)]
pub enum JobOutcome {
    Completed,
    Retry { error: String },
    Failed { error: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(attempts: i32) -> IndexingJob {
        let now = Timestamp::now();
        IndexingJob {
            id: Uuid::now_v7(),
            file_id: Uuid::now_v7(),
            folder_id: Uuid::now_v7(),
            status: JobStatus::Processing,
            priority: 0,
            attempts,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            last_error: None,
            next_attempt_at: None,
            created_at: now,
            started_at: Some(now),
            completed_at: None,
        }
    }

    #[test]
    fn attempts_exhausted_at_max() {
        assert!(job(2).has_attempts_remaining());
        assert!(!job(3).has_attempts_remaining());
    }

    #[test]
    fn backoff_grows_and_caps() {
        assert_eq!(job(0).backoff_delay().as_secs(), 1);
        assert_eq!(job(1).backoff_delay().as_secs(), 2);
        assert_eq!(job(10).backoff_delay().as_secs(), 600);
    }
}
