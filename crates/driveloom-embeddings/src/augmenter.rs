//! The context augmenter (`spec.md` §4.E).

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::TRACING_TARGET;
use crate::error::EmbeddingResult;

/// Chunks shorter than this are embedded as-is; augmenting them would
/// cost a generator call for little retrieval benefit
/// (`spec.md` §4.E "a sufficiently long document (≥ ~500 chars)").
pub const MIN_CHUNK_LENGTH_FOR_AUGMENTATION: usize = 500;

/// How much of the full document is shown to the generator as context
/// (`spec.md` §4.E "first ~6000 characters").
const EXCERPT_CHARS: usize = 6000;

const TRUNCATION_MARKER: &str = "\n[... truncated ...]";

/// Concurrent in-flight generator calls (`spec.md` §4.E "semaphore
/// (nominally 5)").
pub const MAX_CONCURRENT_AUGMENTATIONS: usize = 5;

const MAX_RETRY_ATTEMPTS: u32 = 2;

/// The fast-generator port the augmenter calls per chunk.
#[async_trait]
pub trait GeneratorProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> EmbeddingResult<String>;
}

fn document_excerpt(full_document: &str) -> String {
    if full_document.chars().count() <= EXCERPT_CHARS {
        return full_document.to_owned();
    }
    let mut excerpt: String = full_document.chars().take(EXCERPT_CHARS).collect();
    excerpt.push_str(TRUNCATION_MARKER);
    excerpt
}

fn situate_prompt(file_name: &str, excerpt: &str, chunk_text: &str) -> String {
    format!(
        "You are given a document excerpt and one chunk taken from it. \
         Write 1-2 sentences that situate this chunk within the document for search retrieval purposes.\n\n\
         File: {file_name}\n\nDocument excerpt:\n{excerpt}\n\nChunk:\n{chunk_text}"
    )
}

/// Situates chunks within their document before they're embedded
/// (`spec.md` §4.E). Controlled by `contextual_chunking_enabled` at the
/// call site — this type itself always augments; the indexing worker
/// decides whether to call it.
pub struct ContextAugmenter {
    generator: Arc<dyn GeneratorProvider>,
    semaphore: Arc<Semaphore>,
}

impl ContextAugmenter {
    pub fn new(generator: Arc<dyn GeneratorProvider>) -> Self {
        Self { generator, semaphore: Arc::new(Semaphore::new(MAX_CONCURRENT_AUGMENTATIONS)) }
    }

    /// Returns the text that should be submitted to the embedder for
    /// each chunk. Chunk text stored for display/lexical search is
    /// unchanged by this call (`spec.md` §4.E).
    pub async fn augment(&self, file_name: &str, full_document: &str, chunk_texts: &[String]) -> Vec<String> {
        let excerpt = document_excerpt(full_document);

        let futures = chunk_texts.iter().map(|chunk_text| {
            let excerpt = &excerpt;
            async move {
                if chunk_text.len() < MIN_CHUNK_LENGTH_FOR_AUGMENTATION {
                    return chunk_text.clone();
                }
                match self.situate(file_name, excerpt, chunk_text).await {
                    Ok(context) => format!("{context}\n\n{chunk_text}"),
                    Err(err) => {
                        tracing::warn!(
                            target: TRACING_TARGET,
                            error = %err,
                            "context augmentation failed, embedding raw chunk text"
                        );
                        chunk_text.clone()
                    }
                }
            }
        });

        futures::future::join_all(futures).await
    }

    async fn situate(&self, file_name: &str, excerpt: &str, chunk_text: &str) -> EmbeddingResult<String> {
        let _permit = self.semaphore.acquire().await.expect("semaphore is never closed");
        let prompt = situate_prompt(file_name, excerpt, chunk_text);

        let mut attempt = 0u32;
        loop {
            match self.generator.generate(&prompt).await {
                Ok(context) => return Ok(context),
                Err(err) if err.is_transient() && attempt < MAX_RETRY_ATTEMPTS => {
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EmbeddingError, ErrorKind};

    struct EchoGenerator;

    #[async_trait]
    impl GeneratorProvider for EchoGenerator {
        async fn generate(&self, _prompt: &str) -> EmbeddingResult<String> {
            Ok("situating context".to_owned())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl GeneratorProvider for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> EmbeddingResult<String> {
            Err(EmbeddingError::new(ErrorKind::Internal))
        }
    }

    #[tokio::test]
    async fn short_chunks_skip_augmentation() {
        let augmenter = ContextAugmenter::new(Arc::new(EchoGenerator));
        let chunks = vec!["short".to_owned()];
        let augmented = augmenter.augment("file.txt", "full document text", &chunks).await;
        assert_eq!(augmented[0], "short");
    }

    #[tokio::test]
    async fn long_chunks_are_prefixed_with_context() {
        let augmenter = ContextAugmenter::new(Arc::new(EchoGenerator));
        let chunk = "x".repeat(600);
        let augmented = augmenter.augment("file.txt", "full document text", &[chunk.clone()]).await;
        assert_eq!(augmented[0], format!("situating context\n\n{chunk}"));
    }

    #[tokio::test]
    async fn generator_failure_degrades_to_raw_chunk_text() {
        let augmenter = ContextAugmenter::new(Arc::new(FailingGenerator));
        let chunk = "x".repeat(600);
        let augmented = augmenter.augment("file.txt", "full document text", &[chunk.clone()]).await;
        assert_eq!(augmented[0], chunk);
    }

    #[test]
    fn excerpt_truncates_long_documents() {
        let doc = "a".repeat(7000);
        let excerpt = document_excerpt(&doc);
        assert!(excerpt.ends_with(TRUNCATION_MARKER));
        assert_eq!(excerpt.chars().count(), EXCERPT_CHARS + TRUNCATION_MARKER.chars().count());
    }

    #[test]
    fn short_documents_are_not_truncated() {
        let doc = "hello world";
        assert_eq!(document_excerpt(doc), doc);
    }
}
