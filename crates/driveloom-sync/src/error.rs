//! Synchronizer error types.

use driveloom_core::CoreError;
use driveloom_drive::DriveError;
use driveloom_postgres::PgError;

pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Errors raised while syncing one folder (`spec.md` §4.I "Error
/// handling"). `ReauthorizationRequired` and `FolderMissing` are surfaced
/// distinctly so the caller can prompt for re-consent rather than retry.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("drive listing failed: {0}")]
    Drive(#[from] DriveError),

    #[error("storage error: {0}")]
    Storage(#[from] PgError),

    #[error("remote folder is missing or was deleted")]
    FolderMissing,

    #[error("reauthorization required")]
    ReauthorizationRequired,
}

impl SyncError {
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Drive(err) => err.is_transient(),
            Self::Storage(err) => err.is_transient(),
            Self::FolderMissing | Self::ReauthorizationRequired => false,
        }
    }
}

impl From<SyncError> for CoreError {
    fn from(err: SyncError) -> Self {
        if err.is_transient() { CoreError::transient(err.to_string()) } else { CoreError::permanent(err.to_string()) }
    }
}
