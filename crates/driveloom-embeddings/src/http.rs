//! HTTP embedding client (`spec.md` §4.D): a `reqwest::Client` built once,
//! bearer auth on every request, `tracing` spans around the call.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::TRACING_TARGET;
use crate::error::{EmbeddingError, EmbeddingResult, ErrorKind};
use crate::provider::EmbeddingProvider;

/// Maximum number of texts sent in a single embedding request
/// (`spec.md` §4.D "maximum size is bounded (nominally 50)").
pub const MAX_BATCH_SIZE: usize = 50;

/// Concurrent in-flight batches against the embedding service
/// (`spec.md` §4.D "runs batches concurrently under a semaphore
/// (nominally 6)").
pub const MAX_CONCURRENT_BATCHES: usize = 6;

const RETRY_BASE_DELAY: Duration = Duration::from_millis(200);
const RETRY_FACTOR: u32 = 2;
const MAX_RETRY_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone)]
pub struct HttpEmbeddingConfig {
    pub base_url: url::Url,
    pub api_key: String,
    pub timeout: Duration,
}

impl HttpEmbeddingConfig {
    pub fn new(base_url: url::Url, api_key: impl Into<String>) -> Self {
        Self { base_url, api_key: api_key.into(), timeout: Duration::from_secs(30) }
    }
}

#[derive(Serialize)]
struct EmbedRequestBody<'a> {
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponseBody {
    embeddings: Vec<Vec<f32>>,
}

/// HTTP client for a remote dense-embedding service.
pub struct HttpEmbeddingProvider {
    http: reqwest::Client,
    config: HttpEmbeddingConfig,
    semaphore: Arc<Semaphore>,
}

impl HttpEmbeddingProvider {
    pub fn new(config: HttpEmbeddingConfig) -> EmbeddingResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(EmbeddingError::from)?;

        Ok(Self { http, config, semaphore: Arc::new(Semaphore::new(MAX_CONCURRENT_BATCHES)) })
    }

    async fn embed_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        let _permit = self.semaphore.acquire().await.expect("semaphore is never closed");

        let mut attempt = 0u32;
        loop {
            match self.send_batch(texts).await {
                Ok(vectors) => return Ok(vectors),
                Err(err) if err.is_transient() && attempt < MAX_RETRY_ATTEMPTS => {
                    let delay = err.retry_delay(attempt, RETRY_BASE_DELAY, RETRY_FACTOR);
                    tracing::warn!(
                        target: TRACING_TARGET,
                        attempt,
                        delay_ms = delay.as_millis(),
                        error = %err,
                        "retrying embedding batch"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        let url = self.config.base_url.join("/v1/embeddings").map_err(|e| {
            EmbeddingError::new(ErrorKind::Internal).with_message(e.to_string())
        })?;

        let response = self
            .http
            .post(url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&EmbedRequestBody { input: texts })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let kind = if status.as_u16() == 429 {
                ErrorKind::RateLimited
            } else if status.as_u16() == 401 || status.as_u16() == 403 {
                ErrorKind::Authentication
            } else if status.is_server_error() {
                ErrorKind::ServiceUnavailable
            } else {
                ErrorKind::InvalidInput
            };
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::new(kind).with_message(message));
        }

        let body: EmbedResponseBody = response.json().await?;
        Ok(body.embeddings)
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed_documents(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let batches: Vec<&[String]> = texts.chunks(MAX_BATCH_SIZE).collect();
        tracing::debug!(
            target: TRACING_TARGET,
            texts = texts.len(),
            batches = batches.len(),
            "embedding document batch"
        );

        // All-or-nothing (`spec.md` §4.D): `try_join_all` short-circuits
        // on the first batch error and the rest keep running to
        // completion but their results are discarded.
        let results = futures::future::try_join_all(batches.iter().map(|batch| self.embed_batch(batch))).await?;

        Ok(results.into_iter().flatten().collect())
    }

    async fn embed_query(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let texts = [text.to_owned()];
        let mut vectors = self.embed_batch(&texts).await?;
        vectors.pop().ok_or_else(|| {
            EmbeddingError::new(ErrorKind::Internal).with_message("embedding service returned no vectors")
        })
    }
}
