//! Top-level dispatch from MIME type to extraction path.

use crate::block::Document;
use crate::error::{ExtractionError, ExtractionResult};
use crate::extractors::{native_document, optical, plain_text, spreadsheet};
use crate::kind::ExtractorKind;
use crate::ocr::OcrProvider;

/// Extracts a structured document from raw file bytes, dispatching on
/// MIME type (`spec.md` §4.B).
pub struct Extractor<'a> {
    ocr: &'a dyn OcrProvider,
}

impl<'a> Extractor<'a> {
    pub fn new(ocr: &'a dyn OcrProvider) -> Self {
        Self { ocr }
    }

    pub async fn extract(&self, bytes: &[u8], mime_type: &str) -> ExtractionResult<Document> {
        let kind = ExtractorKind::from_mime_type(mime_type)
            .ok_or_else(|| ExtractionError::UnsupportedMimeType(mime_type.to_owned()))?;

        match kind {
            ExtractorKind::Optical => optical::extract(self.ocr, bytes, mime_type).await,
            ExtractorKind::NativeDocument => native_document::extract(bytes),
            ExtractorKind::Spreadsheet => spreadsheet::extract(bytes),
            ExtractorKind::PlainText => plain_text::extract(bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::ocr::OcrPage;

    struct StubOcr;

    #[async_trait]
    impl OcrProvider for StubOcr {
        async fn ocr_document(&self, _bytes: &[u8], _mime_type: &str) -> ExtractionResult<Vec<OcrPage>> {
            Ok(vec![OcrPage { page: 1, text: "scanned text".into() }])
        }
    }

    #[tokio::test]
    async fn unsupported_mime_type_is_rejected() {
        let ocr = StubOcr;
        let extractor = Extractor::new(&ocr);
        let err = extractor.extract(b"...", "application/x-executable").await.unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedMimeType(_)));
    }

    #[tokio::test]
    async fn routes_pdf_through_ocr() {
        let ocr = StubOcr;
        let extractor = Extractor::new(&ocr);
        let doc = extractor.extract(b"%PDF-1.4", "application/pdf").await.unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc[0].text, "scanned text");
    }

    #[tokio::test]
    async fn routes_plain_text_locally() {
        let ocr = StubOcr;
        let extractor = Extractor::new(&ocr);
        let doc = extractor.extract(b"hello\n\nworld", "text/plain").await.unwrap();
        assert_eq!(doc.len(), 2);
    }
}
