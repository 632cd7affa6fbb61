//! Folder entity (`spec.md` §3 "Folder").

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// State machine position of a folder's indexing lifecycle (`spec.md` §4.F).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderStatus {
    /// Registered but never synced/indexed.
    Pending,
    /// At least one file is being (re-)indexed.
    Indexing,
    /// All files are in a terminal state and none have failed.
    Ready,
    /// All files are in a terminal state and at least one has failed.
    Failed,
}

impl FolderStatus {
    /// Returns whether this status represents a terminal, stable state for
    /// the folder as a whole (as opposed to `Indexing`, which is transient).
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

/// One registered remote folder for one tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub remote_folder_id: String,
    pub name: String,
    pub status: FolderStatus,
    pub files_total: i32,
    pub files_indexed: i32,
    pub last_synced_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Folder {
    /// Invariant from `spec.md` §8: `files_indexed <= files_total`, and
    /// a settled status requires every file to have been accounted for.
    pub fn progress_is_consistent(&self) -> bool {
        self.files_indexed <= self.files_total
            && (!self.status.is_settled() || self.files_indexed == self.files_total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(status: FolderStatus, indexed: i32, total: i32) -> Folder {
        let now = Timestamp::now();
        Folder {
            id: Uuid::now_v7(),
            tenant_id: Uuid::now_v7(),
            remote_folder_id: "remote-1".to_owned(),
            name: "Docs".to_owned(),
            status,
            files_total: total,
            files_indexed: indexed,
            last_synced_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn ready_requires_full_progress() {
        assert!(sample(FolderStatus::Ready, 3, 3).progress_is_consistent());
        assert!(!sample(FolderStatus::Ready, 2, 3).progress_is_consistent());
    }

    #[test]
    fn indexing_allows_partial_progress() {
        assert!(sample(FolderStatus::Indexing, 1, 3).progress_is_consistent());
    }
}
