//! Structural location descriptor (`spec.md` §3 "Chunk").

use serde::{Deserialize, Serialize};

/// Where a block or chunk of text came from within its source file.
///
/// Carries enough structure to deep-link a citation back to the document
/// (`spec.md` §6 `Citation.location`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Location {
    /// A page of a PDF or a scanned image routed through OCR.
    Pdf { page: u32, block_index: u32 },
    /// A paragraph of a native word-processor document.
    Doc { heading_path: String, para_index: u32 },
    /// A row group of a spreadsheet sheet.
    Sheet { sheet_name: String, row_range: String },
}

impl Location {
    /// A short human-readable label for prefixing context blocks and
    /// tool results (`spec.md` §4.H "each chunk prefixed with its source
    /// file name and location").
    pub fn label(&self) -> String {
        match self {
            Self::Pdf { page, .. } => format!("page {page}"),
            Self::Doc { heading_path, .. } if !heading_path.is_empty() => heading_path.clone(),
            Self::Doc { para_index, .. } => format!("paragraph {para_index}"),
            Self::Sheet { sheet_name, row_range } => format!("{sheet_name} rows {row_range}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_label_names_the_page() {
        let loc = Location::Pdf { page: 7, block_index: 2 };
        assert_eq!(loc.label(), "page 7");
    }

    #[test]
    fn doc_label_prefers_heading_path() {
        let loc = Location::Doc {
            heading_path: "Introduction > Scope".to_owned(),
            para_index: 3,
        };
        assert_eq!(loc.label(), "Introduction > Scope");
    }

    #[test]
    fn sheet_label_names_rows() {
        let loc = Location::Sheet {
            sheet_name: "Q4".to_owned(),
            row_range: "10-25".to_owned(),
        };
        assert_eq!(loc.label(), "Q4 rows 10-25");
    }
}
