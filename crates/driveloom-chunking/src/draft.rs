//! The chunker's output shape, before the indexing worker turns it into a
//! full `driveloom_core::types::Chunk` with an id, embedding, and
//! timestamps (`spec.md` §4.C "output: an ordered list of chunks, each
//! with `text`, `location` ..., and `chunk_index`").

use driveloom_core::types::Location;

#[derive(Debug, Clone, PartialEq)]
pub struct ChunkDraft {
    pub text: String,
    pub location: Location,
    /// 0-based, monotonically increasing (`spec.md` §4.C step 5).
    pub chunk_index: i32,
}
