//! Google Drive implementation of [`DriveProvider`], via `opendal`'s
//! `gdrive` service (`SPEC_FULL.md` §4.I): an operator built once from
//! an access token and reused across calls.

use async_trait::async_trait;
use futures::TryStreamExt;
use jiff::Timestamp;
use opendal::{Operator, services};
use serde::{Deserialize, Serialize};

use crate::error::DriveError;
use crate::provider::{DriveEntry, DriveProvider, ListPage};
use crate::{DriveResult, TRACING_TARGET};

/// Per-tenant Google Drive credentials and root scoping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleDriveConfig {
    /// Root path opendal resolves remote folder/file ids under.
    pub root: String,
    pub access_token: String,
}

impl GoogleDriveConfig {
    pub fn new(root: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self { root: root.into(), access_token: access_token.into() }
    }
}

/// A `DriveProvider` backed by one tenant's Google Drive access token.
pub struct GoogleDriveProvider {
    operator: Operator,
}

impl GoogleDriveProvider {
    pub fn new(config: GoogleDriveConfig) -> DriveResult<Self> {
        let builder = services::Gdrive::default()
            .root(&config.root)
            .access_token(&config.access_token);

        let operator = Operator::new(builder)
            .map_err(|e| DriveError::Init(e.to_string()))?
            .finish();

        tracing::info!(target: TRACING_TARGET, "google drive provider initialized");
        Ok(Self { operator })
    }
}

#[async_trait]
impl DriveProvider for GoogleDriveProvider {
    async fn list(&self, folder_id: &str, page_token: Option<&str>) -> DriveResult<ListPage> {
        // opendal's lister already paginates internally; `page_token` here
        // is treated as an entry offset marker rather than a raw API
        // cursor, since the trait's contract only promises it round-trips
        // through `ListPage::next_page_token` unmodified.
        tracing::debug!(target: TRACING_TARGET, folder_id, "listing drive folder");

        let mut lister = self.operator.lister(folder_id).await.map_err(DriveError::from)?;
        let mut files = Vec::new();
        let mut seen = 0usize;
        let skip: usize = page_token.and_then(|t| t.parse().ok()).unwrap_or(0);

        while let Some(entry) = lister.try_next().await.map_err(DriveError::from)? {
            if seen < skip {
                seen += 1;
                continue;
            }
            let meta = self.operator.stat(entry.path()).await.map_err(DriveError::from)?;
            if meta.is_dir() {
                seen += 1;
                continue;
            }
            let modified_time = meta
                .last_modified()
                .and_then(|dt| Timestamp::from_second(dt.timestamp()).ok())
                .unwrap_or_else(Timestamp::now);

            files.push(DriveEntry {
                remote_id: entry.path().to_owned(),
                name: entry.name().to_owned(),
                mime_type: meta.content_type().unwrap_or("application/octet-stream").to_owned(),
                modified_time,
            });
            seen += 1;

            const PAGE_SIZE: usize = 100;
            if files.len() >= PAGE_SIZE {
                return Ok(ListPage { files, next_page_token: Some(seen.to_string()) });
            }
        }

        Ok(ListPage { files, next_page_token: None })
    }

    async fn export_native(&self, file_id: &str, target_mime: &str) -> DriveResult<Vec<u8>> {
        // Google Workspace documents (Docs/Sheets/Slides) have no native
        // byte representation; opendal's gdrive service resolves a read on
        // their path to the export already negotiated by the backend's
        // default export format. `target_mime` is accepted for interface
        // symmetry with `spec.md` §6 but cannot steer the export per-call
        // through opendal's `Read` operation.
        tracing::debug!(target: TRACING_TARGET, file_id, target_mime, "exporting drive file");
        let bytes = self.operator.read(file_id).await.map_err(DriveError::from)?;
        Ok(bytes.to_vec())
    }

    async fn download(&self, file_id: &str) -> DriveResult<Vec<u8>> {
        tracing::debug!(target: TRACING_TARGET, file_id, "downloading drive file");
        let bytes = self.operator.read(file_id).await.map_err(DriveError::from)?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_new_carries_root_and_token() {
        let cfg = GoogleDriveConfig::new("tenant-a/", "secret-token");
        assert_eq!(cfg.root, "tenant-a/");
        assert_eq!(cfg.access_token, "secret-token");
    }

    #[tokio::test]
    async fn provider_new_rejects_nothing_at_construction() {
        // opendal validates lazily; building the operator itself never
        // talks to the network, so construction always succeeds.
        let cfg = GoogleDriveConfig::new("/", "token");
        let provider = GoogleDriveProvider::new(cfg);
        assert!(provider.is_ok());
    }
}
