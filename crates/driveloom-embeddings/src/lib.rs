#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub const TRACING_TARGET: &str = "driveloom_embeddings";

mod augmenter;
mod error;
mod fake;
mod http;
mod provider;

pub use augmenter::{ContextAugmenter, GeneratorProvider, MAX_CONCURRENT_AUGMENTATIONS, MIN_CHUNK_LENGTH_FOR_AUGMENTATION};
pub use error::{EmbeddingError, EmbeddingResult, ErrorKind};
pub use fake::FakeEmbeddingProvider;
pub use http::{HttpEmbeddingConfig, HttpEmbeddingProvider, MAX_BATCH_SIZE, MAX_CONCURRENT_BATCHES};
pub use provider::{DOCUMENT_PREFIX, EMBEDDING_DIMENSIONS, EmbeddingProvider, QUERY_PREFIX};
