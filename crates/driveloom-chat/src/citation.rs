//! Citation map accumulation (`spec.md` §6 "Citation record", §9 decision
//! 2 "numeric `[N]` with a side map"). Markers are assigned in the order
//! chunks first become visible to the model — via the standard-mode
//! retrieval or any `search_folder`/`get_file_chunks` tool call — so the
//! same chunk always keeps the marker it was first shown under.

use std::collections::HashMap;

use driveloom_core::types::{Chunk, Citation, File, Location};
use driveloom_postgres::PgClient;
use driveloom_postgres::query::FileRepository;
use driveloom_search::ScoredChunk;
use uuid::Uuid;

use crate::error::{ChatError, ChatResult};

struct Seen {
    file_id: Uuid,
    file_name: String,
    location: Location,
    excerpt: String,
}

/// Builds the deep link a caller can follow back to the source location
/// in the drive. Google Drive is the only drive backend in scope
/// (`SPEC_FULL.md` §4.I), so this format is fixed rather than
/// provider-abstracted.
pub fn drive_deep_link(remote_file_id: &str) -> String {
    format!("https://drive.google.com/file/d/{remote_file_id}/view")
}

/// Accumulates every chunk surfaced to the model across one chat turn and
/// assigns `[N]` markers on first sight.
#[derive(Default)]
pub struct CitationAccumulator {
    order: Vec<Uuid>,
    seen: HashMap<Uuid, Seen>,
    searched_files: Vec<String>,
}

impl CitationAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records chunks from a retrieval result (standard mode's single
    /// retrieval, or the agentic `search_folder` tool).
    pub fn record_scored(&mut self, chunks: &[ScoredChunk]) {
        for chunk in chunks {
            self.note_file(&chunk.file_name);
            self.seen.entry(chunk.chunk_id).or_insert_with(|| {
                self.order.push(chunk.chunk_id);
                Seen {
                    file_id: chunk.file_id,
                    file_name: chunk.file_name.clone(),
                    location: chunk.location.clone(),
                    excerpt: chunk.excerpt.clone(),
                }
            });
        }
    }

    /// Records raw chunks from the `get_file_chunks` tool, which returns
    /// a file's chunks directly rather than [`ScoredChunk`]s.
    pub fn record_raw(&mut self, file_name: &str, chunks: &[Chunk]) {
        self.note_file(file_name);
        for chunk in chunks {
            self.seen.entry(chunk.id).or_insert_with(|| {
                self.order.push(chunk.id);
                Seen {
                    file_id: chunk.file_id,
                    file_name: file_name.to_owned(),
                    location: chunk.location.clone(),
                    excerpt: driveloom_search::excerpt(&chunk.text),
                }
            });
        }
    }

    fn note_file(&mut self, file_name: &str) {
        if !self.searched_files.iter().any(|f| f == file_name) {
            self.searched_files.push(file_name.to_owned());
        }
    }

    /// The marker a chunk was (or would be) assigned, 1-based, in the
    /// order it was first recorded.
    pub fn marker_for(&self, chunk_id: Uuid) -> Option<usize> {
        self.order.iter().position(|id| *id == chunk_id).map(|pos| pos + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Resolves every recorded chunk's owning file for its drive deep
    /// link and returns the finished citation map plus the searched-file
    /// list, both part of the `done` event (`spec.md` §6).
    pub async fn finalize(self, postgres: &PgClient) -> ChatResult<(HashMap<String, Citation>, Vec<String>)> {
        if self.order.is_empty() {
            return Ok((HashMap::new(), self.searched_files));
        }

        let file_ids: Vec<Uuid> = self.seen.values().map(|s| s.file_id).collect::<std::collections::HashSet<_>>().into_iter().collect();
        let mut conn = postgres.get_connection().await.map_err(ChatError::Storage)?;
        let files: Vec<File> = conn.find_files_by_ids(&file_ids).await.map_err(ChatError::Storage)?;
        let remote_ids: HashMap<Uuid, String> = files.into_iter().map(|f| (f.id, f.remote_file_id)).collect();

        let mut citations = HashMap::new();
        for (index, chunk_id) in self.order.iter().enumerate() {
            let seen = &self.seen[chunk_id];
            let remote_file_id = remote_ids.get(&seen.file_id).map(String::as_str).unwrap_or_default();
            let citation = Citation::new(
                *chunk_id,
                seen.file_id,
                seen.file_name.clone(),
                seen.location.clone(),
                seen.excerpt.clone(),
                drive_deep_link(remote_file_id),
            );
            citations.insert((index + 1).to_string(), citation);
        }

        Ok((citations, self.searched_files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chunk(chunk_id: Uuid, file_id: Uuid) -> ScoredChunk {
        ScoredChunk {
            chunk_id,
            file_id,
            file_name: "report.pdf".to_owned(),
            location: Location::Pdf { page: 1, block_index: 0 },
            excerpt: "revenue was strong".to_owned(),
            score: 0.9,
        }
    }

    #[test]
    fn markers_assigned_in_first_seen_order() {
        let mut acc = CitationAccumulator::new();
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let file_id = Uuid::now_v7();
        acc.record_scored(&[sample_chunk(a, file_id), sample_chunk(b, file_id)]);

        assert_eq!(acc.marker_for(a), Some(1));
        assert_eq!(acc.marker_for(b), Some(2));
    }

    #[test]
    fn repeated_chunk_keeps_its_first_marker() {
        let mut acc = CitationAccumulator::new();
        let a = Uuid::now_v7();
        let file_id = Uuid::now_v7();
        acc.record_scored(&[sample_chunk(a, file_id)]);
        acc.record_scored(&[sample_chunk(a, file_id)]);

        assert_eq!(acc.marker_for(a), Some(1));
        assert_eq!(acc.order.len(), 1);
    }

    #[test]
    fn deep_link_embeds_remote_id() {
        assert_eq!(drive_deep_link("abc123"), "https://drive.google.com/file/d/abc123/view");
    }
}
