//! PDF and scanned-image extraction via remote OCR (`spec.md` §4.B).

use driveloom_core::types::Location;

use crate::block::{Block, Document};
use crate::error::ExtractionResult;
use crate::ocr::OcrProvider;

/// Routes a whole PDF or image through [`OcrProvider`] and turns each
/// returned page into one block tagged with its page number.
pub async fn extract(
    provider: &dyn OcrProvider,
    bytes: &[u8],
    mime_type: &str,
) -> ExtractionResult<Document> {
    let pages = provider.ocr_document(bytes, mime_type).await?;

    Ok(pages
        .into_iter()
        .filter(|page| !page.text.trim().is_empty())
        .map(|page| {
            let location = Location::Pdf { page: page.page, block_index: 0 };
            Block::new(page.text, location)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::ExtractionResult as Result;
    use crate::ocr::OcrPage;

    struct StubOcr(Vec<OcrPage>);

    #[async_trait]
    impl OcrProvider for StubOcr {
        async fn ocr_document(&self, _bytes: &[u8], _mime_type: &str) -> Result<Vec<OcrPage>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn one_block_per_non_empty_page() {
        let provider = StubOcr(vec![
            OcrPage { page: 1, text: "hello".into() },
            OcrPage { page: 2, text: "  ".into() },
            OcrPage { page: 3, text: "world".into() },
        ]);

        let doc = extract(&provider, b"pdf bytes", "application/pdf").await.unwrap();

        assert_eq!(doc.len(), 2);
        assert_eq!(doc[0].text, "hello");
        assert_eq!(doc[1].text, "world");
        assert!(matches!(doc[1].location, Location::Pdf { page: 3, .. }));
    }
}
