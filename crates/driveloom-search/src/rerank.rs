//! The optional remote reranker port and its HTTP implementation
//! (`SPEC_FULL.md` §4.G "optional reranker is a trait ... mirroring the
//! `EmbeddingProvider`/`OcrProvider` trait shape").

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{SearchError, SearchResult};

pub const TRACING_TARGET: &str = "driveloom_search::rerank";

/// One candidate passed to the reranker: its position in the
/// pre-rerank pool and the text to score against the query.
#[derive(Debug, Clone, Serialize)]
pub struct RerankCandidate {
    pub index: usize,
    pub text: String,
}

/// A candidate's refined position after reranking.
#[derive(Debug, Clone, Deserialize)]
pub struct RerankedHit {
    pub index: usize,
    pub score: f64,
}

/// The reranking service port. Failures here must never fail a search;
/// callers degrade to the pre-rerank ordering (`spec.md` §4.G "rerank
/// failures degrade gracefully").
#[async_trait]
pub trait RerankProvider: Send + Sync {
    async fn rerank(&self, query: &str, candidates: &[RerankCandidate]) -> SearchResult<Vec<RerankedHit>>;
}

/// Configuration for [`HttpRerankProvider`].
#[derive(Debug, Clone)]
pub struct HttpRerankConfig {
    pub base_url: url::Url,
    pub api_key: String,
    pub timeout: Duration,
}

impl HttpRerankConfig {
    pub fn new(base_url: url::Url, api_key: impl Into<String>) -> Self {
        Self { base_url, api_key: api_key.into(), timeout: Duration::from_secs(10) }
    }
}

#[derive(Serialize)]
struct RerankRequestBody<'a> {
    query: &'a str,
    candidates: &'a [RerankCandidate],
}

#[derive(Deserialize)]
struct RerankResponseBody {
    results: Vec<RerankedHit>,
}

/// HTTP client for a remote cross-encoder reranker.
pub struct HttpRerankProvider {
    http: reqwest::Client,
    config: HttpRerankConfig,
}

impl HttpRerankProvider {
    pub fn new(config: HttpRerankConfig) -> SearchResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SearchError::Rerank(e.to_string()))?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl RerankProvider for HttpRerankProvider {
    async fn rerank(&self, query: &str, candidates: &[RerankCandidate]) -> SearchResult<Vec<RerankedHit>> {
        let url = self
            .config
            .base_url
            .join("/v1/rerank")
            .map_err(|e| SearchError::Rerank(e.to_string()))?;

        let response = self
            .http
            .post(url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&RerankRequestBody { query, candidates })
            .send()
            .await
            .map_err(|e| SearchError::Rerank(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Rerank(format!("status {status}: {message}")));
        }

        let body: RerankResponseBody =
            response.json().await.map_err(|e| SearchError::Rerank(e.to_string()))?;
        Ok(body.results)
    }
}
