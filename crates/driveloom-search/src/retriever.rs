//! The hybrid retriever (`SPEC_FULL.md` §4.G): a thin service over a
//! storage handle and an embedding provider, returning scored chunks
//! without forcing the caller into any particular transport.
//!
//! Candidates are pooled per signal, scored by a fixed weighted sum
//! (`SPEC_FULL.md` §9 decision 1: sum, not Reciprocal Rank Fusion), and
//! an inactive signal (embedder failure, empty lexical match) simply
//! contributes zero rather than triggering a weight renormalization —
//! the testable property is the final ordering, not the absolute score.

use std::collections::HashMap;
use std::sync::Arc;

use driveloom_core::types::{File, Location};
use driveloom_embeddings::{EmbeddingProvider, QUERY_PREFIX};
use driveloom_postgres::PgClient;
use driveloom_postgres::query::{ChunkRepository, FileRepository, LexicalHit};
use jiff::Timestamp;
use uuid::Uuid;

use crate::error::SearchResult;
use crate::rerank::{RerankCandidate, RerankProvider};
use crate::scored::{ScoredChunk, excerpt};

pub const TRACING_TARGET: &str = "driveloom_search";

/// Per-signal weights (`spec.md` §4.G).
const VECTOR_WEIGHT: f64 = 0.6;
const LEXICAL_WEIGHT: f64 = 0.2;
const RECENCY_WEIGHT: f64 = 0.2;

/// Half-life for the recency signal, in days (`spec.md` §4.G).
const RECENCY_HALF_LIFE_DAYS: f64 = 30.0;

/// Candidates pulled per signal before fusion (`spec.md` §4.G "candidate pool").
pub const CANDIDATES_PER_SIGNAL: i64 = 50;

/// Candidates kept after fusion, before an optional rerank pass.
pub const FUSED_POOL_SIZE: usize = 30;

const DEFAULT_RESULT_COUNT: u32 = 10;

/// One retrieval request, scoped to exactly one folder and tenant
/// (`SPEC_FULL.md` §4.G "computed over chunks belonging to the given
/// folder only"; tenant filtering is defense-in-depth).
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub folder_id: Uuid,
    pub tenant_id: Uuid,
    pub query: String,
    pub k: u32,
}

impl SearchRequest {
    pub fn new(folder_id: Uuid, tenant_id: Uuid, query: impl Into<String>) -> Self {
        Self { folder_id, tenant_id, query: query.into(), k: DEFAULT_RESULT_COUNT }
    }

    pub fn with_k(mut self, k: u32) -> Self {
        self.k = k;
        self
    }
}

/// The hybrid retriever service.
pub struct Retriever {
    postgres: PgClient,
    embeddings: Arc<dyn EmbeddingProvider>,
    reranker: Option<Arc<dyn RerankProvider>>,
}

struct Candidate {
    chunk_id: Uuid,
    file_id: Uuid,
    text: String,
    location: Location,
    vector_score: f64,
    lexical_score: f64,
}

impl Retriever {
    pub fn new(postgres: PgClient, embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        Self { postgres, embeddings, reranker: None }
    }

    pub fn with_reranker(mut self, reranker: Arc<dyn RerankProvider>) -> Self {
        self.reranker = Some(reranker);
        self
    }

    #[tracing::instrument(skip(self, request), fields(folder_id = %request.folder_id, k = request.k), target = TRACING_TARGET)]
    pub async fn search(&self, request: &SearchRequest) -> SearchResult<Vec<ScoredChunk>> {
        let mut conn = self.postgres.get_connection().await?;

        let query_embedding = self.embed_query(&request.query).await;
        let vector_hits = match &query_embedding {
            Some(embedding) => match conn.search_vector(request.folder_id, request.tenant_id, embedding, CANDIDATES_PER_SIGNAL).await {
                Ok(hits) => Some(hits),
                Err(err) => {
                    tracing::warn!(target: TRACING_TARGET, error = %err, "vector search failed, falling back to lexical+recency");
                    None
                }
            },
            None => None,
        };
        let lexical_hits: Vec<LexicalHit> = conn
            .search_lexical(request.folder_id, request.tenant_id, &request.query, CANDIDATES_PER_SIGNAL)
            .await?;

        let vector_active = vector_hits.is_some();
        let lexical_active = !lexical_hits.is_empty();

        if !vector_active && !lexical_active {
            tracing::warn!(target: TRACING_TARGET, "both primary signals returned nothing, returning empty result");
            return Ok(Vec::new());
        }

        let mut candidates: HashMap<Uuid, Candidate> = HashMap::new();

        if let Some(hits) = vector_hits {
            for hit in hits {
                let vector_score = 1.0 - hit.distance;
                candidates
                    .entry(hit.chunk.id)
                    .and_modify(|c| c.vector_score = vector_score)
                    .or_insert_with(|| Candidate {
                        chunk_id: hit.chunk.id,
                        file_id: hit.chunk.file_id,
                        text: hit.chunk.text.clone(),
                        location: hit.chunk.location.clone(),
                        vector_score,
                        lexical_score: 0.0,
                    });
            }
        }

        for hit in lexical_hits {
            candidates
                .entry(hit.chunk.id)
                .and_modify(|c| c.lexical_score = hit.rank)
                .or_insert_with(|| Candidate {
                    chunk_id: hit.chunk.id,
                    file_id: hit.chunk.file_id,
                    text: hit.chunk.text.clone(),
                    location: hit.chunk.location.clone(),
                    vector_score: 0.0,
                    lexical_score: hit.rank,
                });
        }

        let file_ids: Vec<Uuid> = candidates.values().map(|c| c.file_id).collect::<std::collections::HashSet<_>>().into_iter().collect();
        let files = conn.find_files_by_ids(&file_ids).await?;
        let files_by_id: HashMap<Uuid, File> = files.into_iter().map(|f| (f.id, f)).collect();

        let now = Timestamp::now();
        let mut fused: Vec<ScoredChunk> = candidates
            .into_values()
            .filter_map(|candidate| {
                let file = files_by_id.get(&candidate.file_id)?;
                let recency = recency_score(now, file.remote_modified_at);
                let score = fuse(candidate.vector_score, candidate.lexical_score, recency);

                Some(ScoredChunk {
                    chunk_id: candidate.chunk_id,
                    file_id: candidate.file_id,
                    file_name: file.name.clone(),
                    location: candidate.location,
                    excerpt: excerpt(&candidate.text),
                    score,
                })
            })
            .collect();

        fused.sort_by(|a, b| b.score.total_cmp(&a.score));
        fused.truncate(FUSED_POOL_SIZE);

        let reranked = if let Some(reranker) = &self.reranker {
            self.rerank(reranker.as_ref(), &request.query, fused).await
        } else {
            fused
        };

        let mut results = reranked;
        results.truncate(request.k as usize);
        Ok(results)
    }

    async fn embed_query(&self, query: &str) -> Option<Vec<f32>> {
        let prefixed_query = format!("{QUERY_PREFIX}{query}");
        match self.embeddings.embed_query(&prefixed_query).await {
            Ok(embedding) => Some(embedding),
            Err(err) => {
                tracing::warn!(target: TRACING_TARGET, error = %err, "query embedding failed, falling back to lexical+recency");
                None
            }
        }
    }

    async fn rerank(&self, reranker: &dyn RerankProvider, query: &str, pool: Vec<ScoredChunk>) -> Vec<ScoredChunk> {
        let rerank_candidates: Vec<RerankCandidate> = pool
            .iter()
            .enumerate()
            .map(|(index, chunk)| RerankCandidate { index, text: chunk.excerpt.clone() })
            .collect();

        match reranker.rerank(query, &rerank_candidates).await {
            Ok(hits) => {
                let mut by_index: HashMap<usize, f64> = hits.into_iter().map(|h| (h.index, h.score)).collect();
                let mut reordered: Vec<ScoredChunk> = pool
                    .into_iter()
                    .enumerate()
                    .map(|(index, mut chunk)| {
                        if let Some(score) = by_index.remove(&index) {
                            chunk.score = score;
                        }
                        chunk
                    })
                    .collect();
                reordered.sort_by(|a, b| b.score.total_cmp(&a.score));
                reordered
            }
            Err(err) => {
                tracing::warn!(target: TRACING_TARGET, error = %err, "rerank failed, keeping pre-rerank ordering");
                pool
            }
        }
    }
}

/// The fixed weighted sum from `spec.md` §4.G. An inactive signal is
/// passed as `0.0` by the caller rather than excluded from the formula.
fn fuse(vector_score: f64, lexical_score: f64, recency_score: f64) -> f64 {
    VECTOR_WEIGHT * vector_score + LEXICAL_WEIGHT * lexical_score + RECENCY_WEIGHT * recency_score
}

fn recency_score(now: Timestamp, modified_at: Timestamp) -> f64 {
    let delta_seconds = (now.as_second() - modified_at.as_second()) as f64;
    let delta_days = (delta_seconds / 86_400.0).max(0.0);
    (-delta_days / RECENCY_HALF_LIFE_DAYS).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuse_weights_each_signal_per_spec() {
        let score = fuse(1.0, 1.0, 1.0);
        assert!((score - 1.0).abs() < 1e-9);

        let vector_only = fuse(1.0, 0.0, 0.0);
        assert!((vector_only - VECTOR_WEIGHT).abs() < 1e-9);
    }

    #[test]
    fn recency_score_is_one_at_zero_delta() {
        let now = Timestamp::now();
        assert_eq!(recency_score(now, now), 1.0);
    }

    #[test]
    fn recency_score_decays_with_age() {
        let now = Timestamp::now();
        let thirty_days_ago = now - jiff::SignedDuration::from_hours(30 * 24);
        let score = recency_score(now, thirty_days_ago);
        assert!((score - (-1.0_f64).exp()).abs() < 1e-9);
    }

    #[test]
    fn recency_score_never_exceeds_one_for_future_timestamps() {
        let now = Timestamp::now();
        let future = now + jiff::SignedDuration::from_hours(24);
        assert_eq!(recency_score(now, future), 1.0);
    }
}
