#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod error;
mod rerank;
mod retriever;
mod scored;

pub use error::{SearchError, SearchResult};
pub use rerank::{HttpRerankConfig, HttpRerankProvider, RerankCandidate, RerankProvider, RerankedHit};
pub use retriever::{CANDIDATES_PER_SIGNAL, FUSED_POOL_SIZE, Retriever, SearchRequest};
pub use scored::{MAX_EXCERPT_CHARS, ScoredChunk, excerpt};
