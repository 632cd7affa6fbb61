//! Indexing job queue (`SPEC_FULL.md` §4.A, §5 "Postgres-row job queue").

use std::future::Future;

use diesel::prelude::*;
use diesel::sql_types::Uuid as SqlUuid;
use diesel_async::RunQueryDsl;
use driveloom_core::types::{IndexingJob, JobOutcome};
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::model::{DbIndexingJob, NewDbIndexingJob};
use crate::types::DbJobStatus;
use crate::{PgConnection, PgError, PgResult, schema};

pub trait JobRepository {
    /// Enqueues a job for `file_id`, unless one is already pending or
    /// processing (`SPEC_FULL.md` §3 "at most one live job per file").
    fn enqueue_job(
        &mut self,
        file_id: Uuid,
        folder_id: Uuid,
        priority: i32,
    ) -> impl Future<Output = PgResult<IndexingJob>> + Send;

    /// Atomically claims the highest-priority eligible job and marks it
    /// `Processing`, using `SELECT ... FOR UPDATE SKIP LOCKED` so concurrent
    /// workers never block on or double-claim the same row
    /// (`SPEC_FULL.md` §5).
    fn claim_next_job(&mut self) -> impl Future<Output = PgResult<Option<IndexingJob>>> + Send;

    /// Records the outcome of an attempt: `Completed` marks the job done,
    /// `Retry` schedules `next_attempt_at` via the job's backoff delay (or
    /// marks it `Failed` if attempts are exhausted), `Failed` marks it done
    /// with no further retries (`SPEC_FULL.md` §4.F retry policy).
    fn complete_job(
        &mut self,
        job_id: Uuid,
        outcome: JobOutcome,
    ) -> impl Future<Output = PgResult<IndexingJob>> + Send;
}

impl JobRepository for PgConnection {
    async fn enqueue_job(&mut self, file_id: Uuid, folder_id: Uuid, priority: i32) -> PgResult<IndexingJob> {
        use schema::indexing_jobs::dsl;

        let live: Option<DbIndexingJob> = schema::indexing_jobs::table
            .filter(dsl::file_id.eq(file_id))
            .filter(dsl::status.eq_any([DbJobStatus::Pending, DbJobStatus::Processing]))
            .select(DbIndexingJob::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        if let Some(row) = live {
            return Ok(row.into());
        }

        let new_job = NewDbIndexingJob {
            id: Uuid::now_v7(),
            file_id,
            folder_id,
            status: DbJobStatus::Pending,
            priority,
            max_attempts: driveloom_core::types::DEFAULT_MAX_ATTEMPTS,
        };

        let row = diesel::insert_into(schema::indexing_jobs::table)
            .values(&new_job)
            .returning(DbIndexingJob::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(row.into())
    }

    async fn claim_next_job(&mut self) -> PgResult<Option<IndexingJob>> {
        #[derive(QueryableByName)]
        struct ClaimedId {
            #[diesel(sql_type = SqlUuid)]
            id: Uuid,
        }

        let claimed: Option<ClaimedId> = diesel::sql_query(
            "UPDATE indexing_jobs SET status = 'processing', attempts = attempts + 1, \
             started_at = now() WHERE id = ( \
               SELECT id FROM indexing_jobs \
               WHERE status = 'pending' \
                 AND (next_attempt_at IS NULL OR next_attempt_at <= now()) \
               ORDER BY priority DESC, created_at ASC \
               FOR UPDATE SKIP LOCKED \
               LIMIT 1 \
             ) RETURNING id",
        )
        .get_result(self)
        .await
        .optional()
        .map_err(PgError::from)?;

        let Some(claimed) = claimed else {
            return Ok(None);
        };

        use schema::indexing_jobs::dsl;
        let row = schema::indexing_jobs::table
            .filter(dsl::id.eq(claimed.id))
            .select(DbIndexingJob::as_select())
            .first(self)
            .await
            .map_err(PgError::from)?;

        Ok(Some(row.into()))
    }

    async fn complete_job(&mut self, job_id: Uuid, outcome: JobOutcome) -> PgResult<IndexingJob> {
        use schema::indexing_jobs::dsl;

        let current: DbIndexingJob = schema::indexing_jobs::table
            .filter(dsl::id.eq(job_id))
            .select(DbIndexingJob::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)?;
        let current: IndexingJob = current.into();

        let row = match outcome {
            JobOutcome::Completed => {
                diesel::update(schema::indexing_jobs::table.filter(dsl::id.eq(job_id)))
                    .set((
                        dsl::status.eq(DbJobStatus::Completed),
                        dsl::completed_at.eq(Timestamp::from(jiff::Timestamp::now())),
                        dsl::last_error.eq(None::<String>),
                    ))
                    .returning(DbIndexingJob::as_returning())
                    .get_result(self)
                    .await
                    .map_err(PgError::from)?
            }
            JobOutcome::Retry { error } if current.has_attempts_remaining() => {
                let next_attempt_at = jiff::Timestamp::now() + current.backoff_delay();
                diesel::update(schema::indexing_jobs::table.filter(dsl::id.eq(job_id)))
                    .set((
                        dsl::status.eq(DbJobStatus::Pending),
                        dsl::last_error.eq(Some(error)),
                        dsl::next_attempt_at.eq(Some(Timestamp::from(next_attempt_at))),
                    ))
                    .returning(DbIndexingJob::as_returning())
                    .get_result(self)
                    .await
                    .map_err(PgError::from)?
            }
            JobOutcome::Retry { error } | JobOutcome::Failed { error } => {
                diesel::update(schema::indexing_jobs::table.filter(dsl::id.eq(job_id)))
                    .set((
                        dsl::status.eq(DbJobStatus::Failed),
                        dsl::completed_at.eq(Timestamp::from(jiff::Timestamp::now())),
                        dsl::last_error.eq(Some(error)),
                    ))
                    .returning(DbIndexingJob::as_returning())
                    .get_result(self)
                    .await
                    .map_err(PgError::from)?
            }
        };

        Ok(row.into())
    }
}
