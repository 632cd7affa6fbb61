//! The chunking algorithm (`spec.md` §4.C).

use std::collections::HashSet;

use driveloom_core::types::Location;
use driveloom_extraction::{Block, Document};
use text_splitter::{ChunkConfig, TextSplitter};

use crate::ChunkerConfig;
use crate::draft::ChunkDraft;

fn top_level_heading(location: &Location) -> Option<String> {
    match location {
        Location::Doc { heading_path, .. } if !heading_path.is_empty() => {
            heading_path.split(" > ").next().map(str::to_owned)
        }
        _ => None,
    }
}

struct BlockSpan<'a> {
    start: usize,
    block: &'a Block,
}

/// Splits an extracted document into chunk drafts using `text-splitter`
/// within heading-bounded segments.
pub struct Chunker {
    config: ChunkerConfig,
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(ChunkerConfig::default())
    }
}

impl Chunker {
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Groups blocks by heading (`spec.md` §4.C step 3 "chunks never
    /// cross heading level changes") and runs the text splitter within
    /// each group.
    pub fn chunk(&self, document: &Document) -> Vec<ChunkDraft> {
        let chunk_config = ChunkConfig::new(self.config.chunk_range())
            .with_overlap(self.config.overlap)
            .expect("chunker overlap must be smaller than its minimum chunk size");
        let splitter = TextSplitter::new(chunk_config);

        let mut drafts = Vec::new();
        let mut chunk_index = 0i32;

        for segment in self.segment(document) {
            let (text, spans) = Self::concat_segment(&segment);
            if text.is_empty() {
                continue;
            }

            for (offset, chunk_text) in splitter.chunk_indices(&text) {
                let location = Self::locate(&spans, offset).location.clone();
                drafts.push(ChunkDraft { text: chunk_text.to_owned(), location, chunk_index });
                chunk_index += 1;
            }
        }

        drafts
    }

    /// The short preview string stored on the file (`spec.md` §4.C "a
    /// preview string for the file is derived as the concatenation of
    /// the first ~500 characters plus any top-level heading text").
    pub fn derive_preview(&self, document: &Document) -> String {
        const PREVIEW_CHARS: usize = 500;

        let mut seen = HashSet::new();
        let mut headings = Vec::new();
        for block in document {
            if let Some(heading) = top_level_heading(&block.location) {
                if seen.insert(heading.clone()) {
                    headings.push(heading);
                }
            }
        }

        let body = document.iter().map(|b| b.text.as_str()).collect::<Vec<_>>().join(" ");
        let truncated: String = body.chars().take(PREVIEW_CHARS).collect();

        if headings.is_empty() {
            truncated
        } else {
            format!("{}\n\n{truncated}", headings.join(" > "))
        }
    }

    fn segment<'a>(&self, document: &'a Document) -> Vec<Vec<&'a Block>> {
        let mut segments: Vec<Vec<&Block>> = Vec::new();
        let mut current_heading: Option<String> = None;

        for block in document {
            let heading = top_level_heading(&block.location);
            let starts_new_segment = segments.is_empty() || (heading.is_some() && heading != current_heading);

            if starts_new_segment {
                segments.push(Vec::new());
                current_heading = heading;
            }
            segments.last_mut().expect("segment just pushed").push(block);
        }

        segments
    }

    fn concat_segment<'a>(segment: &[&'a Block]) -> (String, Vec<BlockSpan<'a>>) {
        let mut text = String::new();
        let mut spans = Vec::with_capacity(segment.len());

        for block in segment {
            if !text.is_empty() {
                text.push_str("\n\n");
            }
            spans.push(BlockSpan { start: text.len(), block });
            text.push_str(&block.text);
        }

        (text, spans)
    }

    fn locate<'a>(spans: &'a [BlockSpan<'a>], offset: usize) -> &'a Block {
        spans
            .iter()
            .rev()
            .find(|span| span.start <= offset)
            .map(|span| span.block)
            .unwrap_or_else(|| spans[0].block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_block(text: &str, heading_path: &str, para_index: u32) -> Block {
        Block::new(text, Location::Doc { heading_path: heading_path.to_owned(), para_index })
    }

    #[test]
    fn empty_document_yields_no_chunks() {
        let chunker = Chunker::default();
        assert!(chunker.chunk(&Document::new()).is_empty());
    }

    #[test]
    fn chunk_indices_are_contiguous_from_zero() {
        let chunker = Chunker::new(ChunkerConfig::new(200).with_min_chunk_size(50).with_overlap(20));
        let document = vec![
            doc_block(&"alpha beta gamma delta epsilon ".repeat(20), "Intro", 0),
            doc_block(&"zeta eta theta iota kappa ".repeat(20), "Intro", 1),
        ];

        let drafts = chunker.chunk(&document);
        assert!(drafts.len() > 1);
        for (expected, draft) in drafts.iter().enumerate() {
            assert_eq!(draft.chunk_index, expected as i32);
        }
    }

    #[test]
    fn a_new_top_level_heading_forces_a_boundary() {
        let chunker = Chunker::new(ChunkerConfig::new(4000).with_overlap(50));
        let document = vec![
            doc_block("short section one text.", "Section One", 0),
            doc_block("short section two text.", "Section Two", 0),
        ];

        let drafts = chunker.chunk(&document);
        // Each heading's text is far under the target size, so without a
        // forced boundary they would merge into a single chunk.
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].location, Location::Doc { heading_path: "Section One".into(), para_index: 0 });
        assert_eq!(drafts[1].location, Location::Doc { heading_path: "Section Two".into(), para_index: 0 });
    }

    #[test]
    fn preview_combines_headings_and_leading_text() {
        let chunker = Chunker::default();
        let document = vec![doc_block("Some opening text.", "Overview", 0)];
        let preview = chunker.derive_preview(&document);
        assert!(preview.starts_with("Overview"));
        assert!(preview.contains("Some opening text."));
    }

    #[test]
    fn preview_truncates_to_roughly_500_characters() {
        let chunker = Chunker::default();
        let document = vec![doc_block(&"x".repeat(2000), "", 0)];
        let preview = chunker.derive_preview(&document);
        assert_eq!(preview.chars().count(), 500);
    }
}
