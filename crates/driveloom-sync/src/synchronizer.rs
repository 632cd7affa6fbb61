//! The folder synchronizer (`spec.md` §4.I), grounded on
//! `driveloom-indexing`'s job pipeline: a thin service over shared state
//! that walks one external resource and writes its result through the
//! repository traits, retrying transient failures with exponential
//! backoff rather than failing the whole pass.

use std::sync::Arc;

use driveloom_core::types::IndexingJob;
use driveloom_drive::{DriveError, DriveProvider};
use driveloom_postgres::PgClient;
use driveloom_postgres::query::{ChunkRepository, FileRepository, FolderRepository, JobRepository};
use uuid::Uuid;

use crate::TRACING_TARGET;
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};

/// Default priority for jobs enqueued by the synchronizer, matching the
/// indexing worker's "no priority override" default.
const DEFAULT_JOB_PRIORITY: i32 = 0;

/// Outcome of one synchronization pass (`spec.md` §4.I "Output").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub added: u32,
    pub modified: u32,
    pub deleted: u32,
}

pub struct Synchronizer {
    postgres: PgClient,
    drive: Arc<dyn DriveProvider>,
    config: SyncConfig,
}

impl Synchronizer {
    pub fn new(postgres: PgClient, drive: Arc<dyn DriveProvider>) -> Self {
        Self { postgres, drive, config: SyncConfig::default() }
    }

    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs a synchronization pass against the drive's current listing
    /// (`spec.md` §4.I steps 1–7).
    #[tracing::instrument(skip(self), fields(folder_id = %folder_id), target = TRACING_TARGET)]
    pub async fn sync_folder(&self, folder_id: Uuid) -> SyncResult<SyncOutcome> {
        let mut conn = self.postgres.get_connection().await?;
        let folder = conn.find_folder(folder_id).await?;

        let remote_entries = match self.list_all(&folder.remote_folder_id).await {
            Ok(entries) => entries,
            Err(SyncError::Drive(DriveError::FolderMissing(_))) => {
                conn.update_folder_status(folder_id, driveloom_core::types::FolderStatus::Failed).await?;
                return Err(SyncError::FolderMissing);
            }
            Err(SyncError::Drive(DriveError::ReauthorizationRequired)) => {
                return Err(SyncError::ReauthorizationRequired);
            }
            Err(err) => return Err(err),
        };

        let local_files = conn.list_files_for_folder(folder_id).await?;
        let remote_ids: std::collections::HashSet<&str> =
            remote_entries.iter().map(|e| e.remote_id.as_str()).collect();

        let mut outcome = SyncOutcome::default();

        for entry in &remote_entries {
            let existed = local_files.iter().any(|f| f.remote_file_id == entry.remote_id);
            let (file, changed) = conn
                .upsert_file(
                    folder_id,
                    folder.tenant_id,
                    &entry.remote_id,
                    &entry.name,
                    &entry.mime_type,
                    entry.modified_time,
                )
                .await?;

            if !changed {
                continue;
            }

            if existed {
                outcome.modified += 1;
                // Drop the file's stale chunks now; the upsert already
                // nulled its preview/embedding (`spec.md` §4.I step 5).
                conn.replace_chunks(file.id, &[]).await?;
            } else {
                outcome.added += 1;
            }

            self.enqueue(&mut conn, &file).await?;
        }

        for local in &local_files {
            if !remote_ids.contains(local.remote_file_id.as_str()) {
                conn.delete_file(local.id).await?;
                outcome.deleted += 1;
            }
        }

        let files = conn.list_files_for_folder(folder_id).await?;
        let files_total = files.len() as i32;
        let files_failed =
            files.iter().filter(|f| f.status == driveloom_core::types::FileIndexStatus::Failed).count() as i32;
        let files_indexed = files
            .iter()
            .filter(|f| {
                matches!(
                    f.status,
                    driveloom_core::types::FileIndexStatus::Completed
                        | driveloom_core::types::FileIndexStatus::Failed
                )
            })
            .count() as i32;
        conn.update_folder_progress(folder_id, files_total, files_indexed, files_failed, true).await?;

        tracing::info!(
            target: crate::TRACING_TARGET,
            added = outcome.added, modified = outcome.modified, deleted = outcome.deleted,
            "folder sync complete",
        );

        Ok(outcome)
    }

    async fn enqueue(
        &self,
        conn: &mut driveloom_postgres::PgConn,
        file: &driveloom_core::types::File,
    ) -> SyncResult<IndexingJob> {
        Ok(conn.enqueue_job(file.id, file.folder_id, DEFAULT_JOB_PRIORITY).await?)
    }

    /// Fetches every page of a folder's remote listing, retrying a
    /// rate-limited page with exponential backoff
    /// (`spec.md` §4.I "a drive rate-limit response retries with
    /// exponential backoff").
    async fn list_all(&self, remote_folder_id: &str) -> SyncResult<Vec<driveloom_drive::DriveEntry>> {
        let mut entries = Vec::new();
        let mut page_token = None;

        loop {
            let page = self.list_page_with_retry(remote_folder_id, page_token.as_deref()).await?;
            entries.extend(page.files);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(entries)
    }

    async fn list_page_with_retry(
        &self,
        remote_folder_id: &str,
        page_token: Option<&str>,
    ) -> SyncResult<driveloom_drive::ListPage> {
        list_page_with_retry(self.drive.as_ref(), &self.config, remote_folder_id, page_token).await
    }
}

/// Fetches one listing page, retrying a transient failure with
/// exponential backoff before giving up (`spec.md` §4.I "a drive
/// rate-limit response retries with exponential backoff"). Free function
/// so the retry policy is testable without a database.
async fn list_page_with_retry(
    drive: &dyn DriveProvider,
    config: &SyncConfig,
    remote_folder_id: &str,
    page_token: Option<&str>,
) -> SyncResult<driveloom_drive::ListPage> {
    let mut attempt = 0;
    loop {
        match drive.list(remote_folder_id, page_token).await {
            Ok(page) => return Ok(page),
            Err(err) if err.is_transient() && attempt < config.max_backoff_attempts => {
                let delay = config.backoff_delay(attempt);
                tracing::warn!(target: crate::TRACING_TARGET, error = %err, attempt, ?delay, "drive list rate limited, backing off");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(SyncError::from(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use driveloom_drive::{DriveEntry, DriveError, DriveResult, ListPage};

    use super::*;

    #[test]
    fn outcome_defaults_to_zero() {
        assert_eq!(SyncOutcome::default(), SyncOutcome { added: 0, modified: 0, deleted: 0 });
    }

    struct FlakyDrive {
        fails_remaining: AtomicU32,
    }

    #[async_trait]
    impl DriveProvider for FlakyDrive {
        async fn list(&self, _folder_id: &str, _page_token: Option<&str>) -> DriveResult<ListPage> {
            if self.fails_remaining.load(Ordering::SeqCst) > 0 {
                self.fails_remaining.fetch_sub(1, Ordering::SeqCst);
                return Err(DriveError::RateLimited);
            }
            Ok(ListPage { files: vec![DriveEntry {
                remote_id: "f1".to_owned(),
                name: "doc.pdf".to_owned(),
                mime_type: "application/pdf".to_owned(),
                modified_time: jiff::Timestamp::now(),
            }], next_page_token: None })
        }

        async fn export_native(&self, _file_id: &str, _target_mime: &str) -> DriveResult<Vec<u8>> {
            unreachable!("not exercised by this test")
        }

        async fn download(&self, _file_id: &str) -> DriveResult<Vec<u8>> {
            unreachable!("not exercised by this test")
        }
    }

    #[tokio::test]
    async fn transient_failures_are_retried_until_success() {
        let drive = FlakyDrive { fails_remaining: AtomicU32::new(2) };
        let config = SyncConfig { backoff_base_ms: 1, ..SyncConfig::default() };

        let page = list_page_with_retry(&drive, &config, "folder-1", None).await.unwrap();
        assert_eq!(page.files.len(), 1);
    }

    #[tokio::test]
    async fn exhausting_retries_surfaces_the_error() {
        let drive = FlakyDrive { fails_remaining: AtomicU32::new(100) };
        let config = SyncConfig { backoff_base_ms: 1, max_backoff_attempts: 2, ..SyncConfig::default() };

        let err = list_page_with_retry(&drive, &config, "folder-1", None).await.unwrap_err();
        assert!(matches!(err, SyncError::Drive(DriveError::RateLimited)));
    }
}
