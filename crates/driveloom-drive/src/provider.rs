//! The outbound drive provider contract (`spec.md` §6).

use async_trait::async_trait;
use jiff::Timestamp;

use crate::DriveResult;

/// One remote file entry returned by [`DriveProvider::list`].
#[derive(Debug, Clone, PartialEq)]
pub struct DriveEntry {
    pub remote_id: String,
    pub name: String,
    pub mime_type: String,
    pub modified_time: Timestamp,
}

/// A page of [`DriveProvider::list`] results, with an opaque continuation
/// token.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub files: Vec<DriveEntry>,
    pub next_page_token: Option<String>,
}

/// The drive-provider port. One concrete implementation ([`crate::GoogleDriveProvider`])
/// backs it; the synchronizer (`driveloom-sync`) depends only on this trait.
#[async_trait]
pub trait DriveProvider: Send + Sync {
    /// Lists one page of a remote folder's contents, paginated with an
    /// opaque token (`spec.md` §4.I step 1).
    async fn list(&self, folder_id: &str, page_token: Option<&str>) -> DriveResult<ListPage>;

    /// Exports a native (non-binary) document to a target MIME type, e.g.
    /// a Google Doc to `application/pdf` (`spec.md` §6).
    async fn export_native(&self, file_id: &str, target_mime: &str) -> DriveResult<Vec<u8>>;

    /// Downloads a file's raw bytes as stored (`spec.md` §6).
    async fn download(&self, file_id: &str) -> DriveResult<Vec<u8>>;
}
