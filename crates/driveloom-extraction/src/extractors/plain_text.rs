//! Plain text and source file extraction (`spec.md` §4.B "emitted as a
//! single block or paragraph-delimited blocks").

use driveloom_core::types::Location;

use crate::block::{Block, Document};
use crate::error::{ExtractionError, ExtractionResult};

pub fn extract(bytes: &[u8]) -> ExtractionResult<Document> {
    let text = std::str::from_utf8(bytes).map_err(|_| ExtractionError::InvalidEncoding)?;

    let mut blocks = Document::new();
    let mut para_index = 0u32;
    for paragraph in text.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }
        let location = Location::Doc { heading_path: String::new(), para_index };
        blocks.push(Block::new(paragraph, location));
        para_index += 1;
    }

    // A file with content but no blank-line breaks still yields one block.
    if blocks.is_empty() && !text.trim().is_empty() {
        blocks.push(Block::new(text.trim(), Location::Doc { heading_path: String::new(), para_index: 0 }));
    }

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_blank_lines() {
        let doc = extract(b"one\n\ntwo\n\nthree").unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(doc[1].text, "two");
    }

    #[test]
    fn single_paragraph_without_blank_lines_is_one_block() {
        let doc = extract(b"a single run-on line with no breaks").unwrap();
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn empty_input_yields_no_blocks() {
        assert_eq!(extract(b"").unwrap(), Document::new());
    }
}
