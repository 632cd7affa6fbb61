//! Chunk entity (`spec.md` §3 "Chunk").

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Location;

/// A contiguous text fragment extracted from a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: Uuid,
    pub file_id: Uuid,
    /// Denormalized for defense-in-depth tenant filtering (`spec.md` §3, §6).
    pub tenant_id: Uuid,
    /// 0-based, monotonically increasing within the owning file.
    pub chunk_index: i32,
    pub text: String,
    pub location: Location,
    pub embedding: Vec<f32>,
    /// SHA-256 of `text`, used to detect re-indexing that produced
    /// byte-identical chunk content (`SPEC_FULL.md` §3).
    pub content_sha256: [u8; 32],
    pub token_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Chunk {
    /// Computes the SHA-256 of a chunk's text, used both when persisting a
    /// new chunk and when deciding whether re-indexing actually changed it.
    pub fn hash_text(text: &str) -> [u8; 32] {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hasher.finalize().into()
    }
}

/// Validates that a sequence of chunk indices for one file is the
/// contiguous, gap-free `{0, 1, ..., n-1}` sequence required by
/// `spec.md` §3 and §8.
pub fn indices_are_contiguous(chunks: &[Chunk]) -> bool {
    chunks
        .iter()
        .enumerate()
        .all(|(expected, chunk)| chunk.chunk_index as usize == expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(file_id: Uuid, index: i32) -> Chunk {
        let now = Timestamp::now();
        Chunk {
            id: Uuid::now_v7(),
            file_id,
            tenant_id: Uuid::now_v7(),
            chunk_index: index,
            text: format!("chunk {index}"),
            location: Location::Doc {
                heading_path: String::new(),
                para_index: index as u32,
            },
            embedding: vec![0.0; 768],
            content_sha256: Chunk::hash_text(&format!("chunk {index}")),
            token_count: 10,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn contiguous_sequence_is_accepted() {
        let file_id = Uuid::now_v7();
        let chunks = vec![chunk(file_id, 0), chunk(file_id, 1), chunk(file_id, 2)];
        assert!(indices_are_contiguous(&chunks));
    }

    #[test]
    fn gap_in_sequence_is_rejected() {
        let file_id = Uuid::now_v7();
        let chunks = vec![chunk(file_id, 0), chunk(file_id, 2)];
        assert!(!indices_are_contiguous(&chunks));
    }

    #[test]
    fn empty_document_has_no_chunks() {
        let chunks: Vec<Chunk> = vec![];
        assert!(indices_are_contiguous(&chunks));
    }

    #[test]
    fn hash_is_stable_and_content_sensitive() {
        assert_eq!(Chunk::hash_text("same"), Chunk::hash_text("same"));
        assert_ne!(Chunk::hash_text("a"), Chunk::hash_text("b"));
    }
}
