//! A deterministic in-process embedding provider for tests: returns a
//! fixed-dimension placeholder vector instead of calling out to a real
//! service.

use async_trait::async_trait;

use crate::error::EmbeddingResult;
use crate::provider::{EMBEDDING_DIMENSIONS, EmbeddingProvider};

/// Returns a fixed-dimension vector derived from each text's length, so
/// distinct inputs produce distinguishable (if not semantically
/// meaningful) vectors in tests.
#[derive(Debug, Clone)]
pub struct FakeEmbeddingProvider {
    dimensions: usize,
}

impl Default for FakeEmbeddingProvider {
    fn default() -> Self {
        Self { dimensions: EMBEDDING_DIMENSIONS }
    }
}

impl FakeEmbeddingProvider {
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let seed = (text.len() as f32 + 1.0).recip();
        vec![seed; self.dimensions]
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbeddingProvider {
    async fn embed_documents(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }

    async fn embed_query(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        Ok(self.vector_for(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn produces_vectors_of_the_configured_dimension() {
        let provider = FakeEmbeddingProvider::default();
        let vectors = provider.embed_documents(&["a".into(), "bb".into()]).await.unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].len(), EMBEDDING_DIMENSIONS);
        assert_ne!(vectors[0], vectors[1]);
    }

    #[tokio::test]
    async fn empty_batch_returns_empty_vectors() {
        let provider = FakeEmbeddingProvider::default();
        let vectors = provider.embed_documents(&[]).await.unwrap();
        assert!(vectors.is_empty());
    }
}
