//! Native word-processor document extraction (`spec.md` §4.B "converted
//! to a marked-up intermediate (heading-preserving) and blocks are
//! emitted per paragraph, carrying the cumulative heading path").
//!
//! The drive layer exports Google Docs and `.docx` files to Markdown
//! before they reach this crate, so extraction here is Markdown parsing,
//! not binary document parsing.

use driveloom_core::types::Location;
use regex::Regex;
use std::sync::LazyLock;

use crate::block::{Block, Document};
use crate::error::{ExtractionError, ExtractionResult};

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());

pub fn extract(bytes: &[u8]) -> ExtractionResult<Document> {
    let text = std::str::from_utf8(bytes).map_err(|_| ExtractionError::InvalidEncoding)?;

    let mut heading_path: Vec<String> = Vec::new();
    let mut blocks = Document::new();
    let mut para_index = 0u32;

    for paragraph in text.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }

        if let Some(caps) = HEADING.captures(paragraph) {
            let level = caps[1].len();
            let title = caps[2].trim().to_owned();
            heading_path.truncate(level.saturating_sub(1));
            heading_path.push(title);
            continue;
        }

        let location = Location::Doc { heading_path: heading_path.join(" > "), para_index };
        blocks.push(Block::new(paragraph, location));
        para_index += 1;
    }

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_carry_the_cumulative_heading_path() {
        let markdown = "# Introduction\n\nFirst paragraph.\n\n## Scope\n\nSecond paragraph.";
        let doc = extract(markdown.as_bytes()).unwrap();

        assert_eq!(doc.len(), 2);
        assert_eq!(doc[0].text, "First paragraph.");
        assert_eq!(
            doc[0].location,
            Location::Doc { heading_path: "Introduction".into(), para_index: 0 }
        );
        assert_eq!(
            doc[1].location,
            Location::Doc { heading_path: "Introduction > Scope".into(), para_index: 1 }
        );
    }

    #[test]
    fn a_new_top_level_heading_resets_the_path() {
        let markdown = "# A\n\n## A.1\n\ntext one\n\n# B\n\ntext two";
        let doc = extract(markdown.as_bytes()).unwrap();

        assert_eq!(doc[0].location, Location::Doc { heading_path: "A > A.1".into(), para_index: 0 });
        assert_eq!(doc[1].location, Location::Doc { heading_path: "B".into(), para_index: 1 });
    }

    #[test]
    fn empty_document_yields_no_blocks() {
        assert_eq!(extract(b"").unwrap(), Document::new());
    }
}
