//! Drive provider error types.

pub type DriveResult<T> = Result<T, DriveError>;

/// Errors that can occur when talking to a drive provider
/// (`SPEC_FULL.md` §4.I error handling).
#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    #[error("drive backend initialization failed: {0}")]
    Init(String),

    #[error("remote folder not found: {0}")]
    FolderMissing(String),

    #[error("reauthorization required")]
    ReauthorizationRequired,

    #[error("rate limited, retry after backoff")]
    RateLimited,

    #[error("drive request timed out")]
    Timeout,

    #[error("drive backend error: {0}")]
    Backend(opendal::Error),
}

impl DriveError {
    /// Whether this error should be retried with exponential backoff
    /// (`spec.md` §4.I "a drive rate-limit response retries with
    /// exponential backoff").
    pub fn is_transient(&self) -> bool {
        matches!(self, DriveError::RateLimited | DriveError::Timeout)
    }
}

impl From<opendal::Error> for DriveError {
    fn from(err: opendal::Error) -> Self {
        use opendal::ErrorKind;

        match err.kind() {
            ErrorKind::NotFound => Self::FolderMissing(err.to_string()),
            ErrorKind::PermissionDenied => Self::ReauthorizationRequired,
            ErrorKind::RateLimited => Self::RateLimited,
            _ => Self::Backend(err),
        }
    }
}
