//! MIME-polymorphic dispatch (`spec.md` §4.B "extraction is polymorphic
//! over the MIME type").

/// Which extraction path a file's MIME type routes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorKind {
    /// PDF or a scanned image: routed to the remote OCR service.
    Optical,
    /// A native word-processor document, already exported to a
    /// heading-preserving markup (`spec.md` §4.B "converted to a
    /// marked-up intermediate").
    NativeDocument,
    /// A spreadsheet workbook.
    Spreadsheet,
    /// Plain text or source code.
    PlainText,
}

impl ExtractorKind {
    /// Classifies a MIME type, returning `None` for types this crate has
    /// no extraction path for (`ExtractionError::UnsupportedMimeType`).
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" | "image/png" | "image/jpeg" | "image/tiff" | "image/webp" => {
                Some(Self::Optical)
            }
            "text/markdown"
            | "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            | "application/vnd.google-apps.document" => Some(Self::NativeDocument),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.ms-excel"
            | "application/vnd.google-apps.spreadsheet" => Some(Self::Spreadsheet),
            other if other.starts_with("text/") => Some(Self::PlainText),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_mime_types() {
        assert_eq!(ExtractorKind::from_mime_type("application/pdf"), Some(ExtractorKind::Optical));
        assert_eq!(ExtractorKind::from_mime_type("text/markdown"), Some(ExtractorKind::NativeDocument));
        assert_eq!(
            ExtractorKind::from_mime_type("application/vnd.ms-excel"),
            Some(ExtractorKind::Spreadsheet)
        );
        assert_eq!(ExtractorKind::from_mime_type("text/plain"), Some(ExtractorKind::PlainText));
    }

    #[test]
    fn rejects_unknown_mime_types() {
        assert_eq!(ExtractorKind::from_mime_type("application/x-executable"), None);
    }
}
