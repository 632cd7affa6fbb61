//! Indexing worker error types.

use driveloom_core::CoreError;
use driveloom_drive::DriveError;
use driveloom_embeddings::EmbeddingError;
use driveloom_extraction::ExtractionError;
use driveloom_postgres::PgError;

pub type IndexingResult<T> = std::result::Result<T, IndexingError>;

/// Errors raised while processing one indexing job.
///
/// Each variant wraps the narrow error type of the stage that failed; the
/// worker consults [`IndexingError::is_transient`] to decide between
/// rescheduling the job and marking it permanently failed
/// (`spec.md` §4.F retry policy).
#[derive(Debug, thiserror::Error)]
pub enum IndexingError {
    #[error("drive fetch failed: {0}")]
    Drive(#[from] DriveError),

    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("storage error: {0}")]
    Storage(#[from] PgError),
}

impl IndexingError {
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Drive(err) => err.is_transient(),
            Self::Extraction(err) => err.is_transient(),
            Self::Embedding(err) => err.is_transient(),
            Self::Storage(err) => err.is_transient(),
        }
    }
}

impl From<IndexingError> for CoreError {
    fn from(err: IndexingError) -> Self {
        if err.is_transient() {
            CoreError::transient(err.to_string())
        } else {
            CoreError::permanent(err.to_string())
        }
    }
}
