//! Extraction error types (`SPEC_FULL.md` §4.B).

pub type ExtractionResult<T> = std::result::Result<T, ExtractionError>;

/// Errors raised while turning raw file bytes into text blocks.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("unsupported MIME type: {0}")]
    UnsupportedMimeType(String),

    #[error("invalid OCR client configuration: {0}")]
    Config(String),

    #[error("OCR request failed: {0}")]
    Ocr(#[from] reqwest::Error),

    #[error("OCR service returned {status}: {message}")]
    OcrApiError { status: u16, message: String },

    #[error("spreadsheet parsing failed: {0}")]
    Spreadsheet(String),

    #[error("document is not valid UTF-8 text")]
    InvalidEncoding,
}

impl ExtractionError {
    /// Whether the whole indexing job should be retried
    /// (`spec.md` §4.B "transient OCR errors must be surfaced so the
    /// worker can retry the whole job").
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Ocr(err) => err.is_timeout() || err.is_connect(),
            Self::OcrApiError { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
