#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub const TRACING_TARGET: &str = "driveloom_chunking";

mod chunker;
mod config;
mod draft;

pub use chunker::Chunker;
pub use config::{ChunkerConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_MIN_CHUNK_SIZE, DEFAULT_TARGET_CHUNK_SIZE};
pub use draft::ChunkDraft;
