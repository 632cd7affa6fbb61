//! Indexing job model.

use diesel::prelude::*;
use driveloom_core::types::IndexingJob;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::indexing_jobs;
use crate::types::DbJobStatus;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = indexing_jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DbIndexingJob {
    pub id: Uuid,
    pub file_id: Uuid,
    pub folder_id: Uuid,
    pub status: DbJobStatus,
    pub priority: i32,
    pub attempts: i32,
    pub max_attempts: i32,
    pub last_error: Option<String>,
    pub next_attempt_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = indexing_jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDbIndexingJob {
    pub id: Uuid,
    pub file_id: Uuid,
    pub folder_id: Uuid,
    pub status: DbJobStatus,
    pub priority: i32,
    pub max_attempts: i32,
}

impl From<DbIndexingJob> for IndexingJob {
    fn from(row: DbIndexingJob) -> Self {
        IndexingJob {
            id: row.id,
            file_id: row.file_id,
            folder_id: row.folder_id,
            status: row.status.into(),
            priority: row.priority,
            attempts: row.attempts,
            max_attempts: row.max_attempts,
            last_error: row.last_error,
            next_attempt_at: row.next_attempt_at.map(Into::into),
            created_at: row.created_at.into(),
            started_at: row.started_at.map(Into::into),
            completed_at: row.completed_at.map(Into::into),
        }
    }
}
