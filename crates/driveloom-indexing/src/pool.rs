//! The worker loop (`spec.md` §4.F), grounded on the spawn-with-semaphore
//! shape of `nvisy-worker::handler::postprocessing::PostprocessingWorker` —
//! adapted from a NATS subscription loop to a Postgres `claim_next_job`
//! poll loop, since this workspace's job queue lives in a table rather
//! than a message stream.

use std::sync::Arc;
use std::time::Duration;

use driveloom_core::types::{FileIndexStatus, IndexingJob, JobOutcome};
use driveloom_postgres::PgError;
use driveloom_postgres::query::{FileRepository, FolderRepository, JobRepository};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::TRACING_TARGET;
use crate::job;
use crate::state::WorkerState;

/// One executor in the indexing worker pool. Multiple instances may run
/// concurrently against the same database; `claim_next_job`'s `SKIP
/// LOCKED` semantics keep them from processing the same job
/// (`spec.md` §4.F "no two workers may process the same job").
pub struct IndexingWorker {
    state: WorkerState,
    worker_id: String,
    cancel_token: CancellationToken,
    semaphore: Arc<Semaphore>,
    poll_interval: Duration,
}

impl IndexingWorker {
    pub fn new(
        state: WorkerState,
        worker_id: impl Into<String>,
        poll_interval: Duration,
        cancel_token: CancellationToken,
    ) -> Self {
        let semaphore = state.create_semaphore();
        Self { state, worker_id: worker_id.into(), cancel_token, semaphore, poll_interval }
    }

    /// Spawns the worker as a background task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    #[tracing::instrument(skip(self), fields(worker = %self.worker_id), target = TRACING_TARGET, name = "indexing_worker")]
    async fn run(self) {
        tracing::info!(target: TRACING_TARGET, "starting indexing worker");

        loop {
            if self.cancel_token.is_cancelled() {
                break;
            }

            let permit = match self.semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    tracing::error!(target: TRACING_TARGET, "semaphore closed, stopping worker");
                    break;
                }
            };

            let claimed = self.claim_next().await;
            let job = match claimed {
                Ok(Some(job)) => job,
                Ok(None) => {
                    drop(permit);
                    tokio::select! {
                        () = tokio::time::sleep(self.poll_interval) => {}
                        () = self.cancel_token.cancelled() => break,
                    }
                    continue;
                }
                Err(err) => {
                    tracing::error!(target: TRACING_TARGET, error = %err, "failed to claim next job");
                    drop(permit);
                    tokio::time::sleep(self.poll_interval).await;
                    continue;
                }
            };

            let state = self.state.clone();
            tokio::spawn(async move {
                let _permit = permit;
                run_job(&state, job).await;
            });
        }

        tracing::info!(target: TRACING_TARGET, "indexing worker stopped");
    }

    async fn claim_next(&self) -> Result<Option<IndexingJob>, PgError> {
        let mut conn = self.state.postgres.get_connection().await?;
        conn.claim_next_job().await
    }
}

/// Runs one job's pipeline and records its outcome, then refreshes the
/// owning folder's progress and status (`spec.md` §4.F "finally:
/// storage.update_folder_progress(job.folder)").
#[tracing::instrument(skip(state, job), fields(job_id = %job.id, file_id = %job.file_id, attempt = job.attempts), target = TRACING_TARGET)]
async fn run_job(state: &WorkerState, job: IndexingJob) {
    let outcome = match job::process(state, &job).await {
        Ok(()) => {
            tracing::info!(target: TRACING_TARGET, "job completed");
            JobOutcome::Completed
        }
        Err(err) if err.is_transient() => {
            tracing::warn!(target: TRACING_TARGET, error = %err, "job failed transiently, scheduling retry");
            JobOutcome::Retry { error: err.to_string() }
        }
        Err(err) => {
            tracing::error!(target: TRACING_TARGET, error = %err, "job failed permanently");
            JobOutcome::Failed { error: err.to_string() }
        }
    };

    if let Err(err) = finish(state, &job, outcome).await {
        tracing::error!(target: TRACING_TARGET, error = %err, "failed to record job outcome");
    }
}

async fn finish(state: &WorkerState, job: &IndexingJob, outcome: JobOutcome) -> Result<(), PgError> {
    let mut conn = state.postgres.get_connection().await?;
    let completed = conn.complete_job(job.id, outcome).await?;

    if completed.status == driveloom_core::types::JobStatus::Failed {
        conn.update_file_status(job.file_id, FileIndexStatus::Failed).await?;
    }

    let files = conn.list_files_for_folder(job.folder_id).await?;
    let files_total = files.len() as i32;
    let files_failed = files.iter().filter(|f| f.status == FileIndexStatus::Failed).count() as i32;
    let files_indexed = files
        .iter()
        .filter(|f| f.status == FileIndexStatus::Completed || f.status == FileIndexStatus::Failed)
        .count() as i32;

    conn.update_folder_progress(job.folder_id, files_total, files_indexed, files_failed, false).await?;
    Ok(())
}
