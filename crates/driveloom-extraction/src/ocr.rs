//! The remote OCR provider port and its HTTP implementation
//! (`spec.md` §4.B "PDFs and scanned images are routed to a remote OCR
//! service").

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, ExtractionResult};

pub const TRACING_TARGET: &str = "driveloom_extraction::ocr";

/// One OCR'd page.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrPage {
    pub page: u32,
    pub text: String,
}

/// The OCR service port. `OpticalExtractor` depends only on this trait.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// Runs OCR over a whole document (a multi-page PDF or single image),
    /// returning one page per entry.
    async fn ocr_document(&self, bytes: &[u8], mime_type: &str) -> ExtractionResult<Vec<OcrPage>>;
}

/// Configuration for [`HttpOcrProvider`].
#[derive(Debug, Clone)]
pub struct HttpOcrConfig {
    pub base_url: url::Url,
    pub api_key: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl HttpOcrConfig {
    pub fn new(base_url: url::Url, api_key: impl Into<String>) -> Self {
        Self {
            base_url,
            api_key: api_key.into(),
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct OcrRequestBody<'a> {
    #[serde(with = "base64_bytes")]
    content: &'a [u8],
    mime_type: &'a str,
}

#[derive(Deserialize)]
struct OcrResponseBody {
    pages: Vec<OcrPage>,
}

mod base64_bytes {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bytes: &&[u8], serializer: S) -> Result<S::Ok, S::Error> {
        use base64::Engine;
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }
}

/// HTTP client for a remote OCR service.
pub struct HttpOcrProvider {
    http: reqwest::Client,
    config: HttpOcrConfig,
}

impl HttpOcrProvider {
    pub fn new(config: HttpOcrConfig) -> ExtractionResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl OcrProvider for HttpOcrProvider {
    async fn ocr_document(&self, bytes: &[u8], mime_type: &str) -> ExtractionResult<Vec<OcrPage>> {
        tracing::debug!(
            target: TRACING_TARGET,
            mime_type,
            bytes = bytes.len(),
            "submitting document for OCR"
        );

        let url = self
            .config
            .base_url
            .join("/v1/ocr")
            .map_err(|e| ExtractionError::Config(e.to_string()))?;

        let response = self
            .http
            .post(url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&OcrRequestBody { content: bytes, mime_type })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ExtractionError::OcrApiError { status, message });
        }

        let body: OcrResponseBody = response.json().await?;
        Ok(body.pages)
    }
}
