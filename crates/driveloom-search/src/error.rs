//! Retriever error types.

use driveloom_embeddings::EmbeddingError;
use driveloom_postgres::PgError;

pub type SearchResult<T> = std::result::Result<T, SearchError>;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("query embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("storage error: {0}")]
    Storage(#[from] PgError),

    #[error("rerank request failed: {0}")]
    Rerank(String),
}

impl SearchError {
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Embedding(err) => err.is_transient(),
            Self::Storage(err) => err.is_transient(),
            Self::Rerank(_) => false,
        }
    }
}
