//! Postgres-mapped mirrors of the domain enums in `driveloom_core::types`.
//!
//! Diesel's `DbEnum` derive needs a type it owns, so these wrap the core
//! enums at the storage boundary rather than deriving `DbEnum` on the core
//! types directly and pulling a Postgres dependency into `driveloom-core`.

use diesel_derive_enum::DbEnum;
use driveloom_core::types::{FileIndexStatus, FolderStatus, JobStatus, MessageRole};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::FolderStatus"]
pub enum DbFolderStatus {
    #[db_rename = "pending"]
    Pending,
    #[db_rename = "indexing"]
    Indexing,
    #[db_rename = "ready"]
    Ready,
    #[db_rename = "failed"]
    Failed,
}

impl From<FolderStatus> for DbFolderStatus {
    fn from(value: FolderStatus) -> Self {
        match value {
            FolderStatus::Pending => Self::Pending,
            FolderStatus::Indexing => Self::Indexing,
            FolderStatus::Ready => Self::Ready,
            FolderStatus::Failed => Self::Failed,
        }
    }
}

impl From<DbFolderStatus> for FolderStatus {
    fn from(value: DbFolderStatus) -> Self {
        match value {
            DbFolderStatus::Pending => Self::Pending,
            DbFolderStatus::Indexing => Self::Indexing,
            DbFolderStatus::Ready => Self::Ready,
            DbFolderStatus::Failed => Self::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::FileIndexStatus"]
pub enum DbFileIndexStatus {
    #[db_rename = "pending"]
    Pending,
    #[db_rename = "indexing"]
    Indexing,
    #[db_rename = "completed"]
    Completed,
    #[db_rename = "failed"]
    Failed,
}

impl From<FileIndexStatus> for DbFileIndexStatus {
    fn from(value: FileIndexStatus) -> Self {
        match value {
            FileIndexStatus::Pending => Self::Pending,
            FileIndexStatus::Indexing => Self::Indexing,
            FileIndexStatus::Completed => Self::Completed,
            FileIndexStatus::Failed => Self::Failed,
        }
    }
}

impl From<DbFileIndexStatus> for FileIndexStatus {
    fn from(value: DbFileIndexStatus) -> Self {
        match value {
            DbFileIndexStatus::Pending => Self::Pending,
            DbFileIndexStatus::Indexing => Self::Indexing,
            DbFileIndexStatus::Completed => Self::Completed,
            DbFileIndexStatus::Failed => Self::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::JobStatus"]
pub enum DbJobStatus {
    #[db_rename = "pending"]
    Pending,
    #[db_rename = "processing"]
    Processing,
    #[db_rename = "completed"]
    Completed,
    #[db_rename = "failed"]
    Failed,
}

impl From<JobStatus> for DbJobStatus {
    fn from(value: JobStatus) -> Self {
        match value {
            JobStatus::Pending => Self::Pending,
            JobStatus::Processing => Self::Processing,
            JobStatus::Completed => Self::Completed,
            JobStatus::Failed => Self::Failed,
        }
    }
}

impl From<DbJobStatus> for JobStatus {
    fn from(value: DbJobStatus) -> Self {
        match value {
            DbJobStatus::Pending => Self::Pending,
            DbJobStatus::Processing => Self::Processing,
            DbJobStatus::Completed => Self::Completed,
            DbJobStatus::Failed => Self::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::MessageRole"]
pub enum DbMessageRole {
    #[db_rename = "user"]
    User,
    #[db_rename = "assistant"]
    Assistant,
}

impl From<MessageRole> for DbMessageRole {
    fn from(value: MessageRole) -> Self {
        match value {
            MessageRole::User => Self::User,
            MessageRole::Assistant => Self::Assistant,
        }
    }
}

impl From<DbMessageRole> for MessageRole {
    fn from(value: DbMessageRole) -> Self {
        match value {
            DbMessageRole::User => Self::User,
            DbMessageRole::Assistant => Self::Assistant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_status_round_trips_through_db_mirror() {
        for status in [
            FolderStatus::Pending,
            FolderStatus::Indexing,
            FolderStatus::Ready,
            FolderStatus::Failed,
        ] {
            let db: DbFolderStatus = status.into();
            assert_eq!(FolderStatus::from(db), status);
        }
    }

    #[test]
    fn job_status_round_trips_through_db_mirror() {
        for status in [
            JobStatus::Pending,
            JobStatus::Processing,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            let db: DbJobStatus = status.into();
            assert_eq!(JobStatus::from(db), status);
        }
    }
}
