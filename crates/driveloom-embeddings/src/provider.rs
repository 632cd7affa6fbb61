//! The embedding client port (`spec.md` §4.D).

use async_trait::async_trait;

use crate::error::EmbeddingResult;

/// Dense vector dimensionality produced by all providers
/// (`spec.md` §4.D "fixed dimensionality (768)").
pub const EMBEDDING_DIMENSIONS: usize = 768;

/// Prefix distinguishing document-mode text from query-mode text
/// (`spec.md` §4.D, §4.F "`"search_document: " + preview`").
pub const DOCUMENT_PREFIX: &str = "search_document: ";

/// Prefix for query-mode embedding calls (`spec.md` §4.D).
pub const QUERY_PREFIX: &str = "search_query: ";

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds a batch of document-mode texts, preserving order
    /// (`spec.md` §4.D "preserves order ... all-or-nothing").
    async fn embed_documents(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>>;

    /// Embeds one query-mode text.
    async fn embed_query(&self, text: &str) -> EmbeddingResult<Vec<f32>>;
}
