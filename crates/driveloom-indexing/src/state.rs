//! Shared worker state (grounded on `nvisy-worker::service::state::WorkerState`:
//! `Arc`-wrapped shared clients plus a `Semaphore` sized to `max_concurrent_jobs`).

use std::sync::Arc;

use driveloom_chunking::Chunker;
use driveloom_drive::DriveProvider;
use driveloom_embeddings::{ContextAugmenter, EmbeddingProvider};
use driveloom_extraction::{Extractor, OcrProvider};
use driveloom_postgres::PgClient;
use tokio::sync::Semaphore;

use crate::config::WorkerConfig;
use crate::error::IndexingResult;

#[derive(Clone)]
pub struct WorkerState {
    pub postgres: PgClient,
    pub drive: Arc<dyn DriveProvider>,
    pub ocr: Arc<dyn OcrProvider>,
    pub embeddings: Arc<dyn EmbeddingProvider>,
    pub augmenter: Option<Arc<ContextAugmenter>>,
    pub chunker: Arc<Chunker>,
    pub max_concurrent_jobs: usize,
}

impl WorkerState {
    pub fn new(
        postgres: PgClient,
        drive: Arc<dyn DriveProvider>,
        ocr: Arc<dyn OcrProvider>,
        embeddings: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            postgres,
            drive,
            ocr,
            embeddings,
            augmenter: None,
            chunker: Arc::new(Chunker::default()),
            max_concurrent_jobs: crate::config::DEFAULT_MAX_CONCURRENT_JOBS,
        }
    }

    pub fn with_augmenter(mut self, augmenter: Arc<ContextAugmenter>) -> Self {
        self.augmenter = Some(augmenter);
        self
    }

    pub fn with_chunker(mut self, chunker: Chunker) -> Self {
        self.chunker = Arc::new(chunker);
        self
    }

    pub fn with_max_concurrent_jobs(mut self, max_concurrent_jobs: usize) -> Self {
        self.max_concurrent_jobs = max_concurrent_jobs;
        self
    }

    pub(crate) fn create_semaphore(&self) -> Arc<Semaphore> {
        Arc::new(Semaphore::new(self.max_concurrent_jobs))
    }

    /// Builds the shared state from config plus the service handles the
    /// binary wires up (`spec.md` §4.F: the providers themselves are out
    /// of this workspace's scope, so they're constructed by the caller).
    pub async fn from_config(
        config: &WorkerConfig,
        drive: Arc<dyn DriveProvider>,
        ocr: Arc<dyn OcrProvider>,
        embeddings: Arc<dyn EmbeddingProvider>,
    ) -> IndexingResult<Self> {
        let postgres = PgClient::new(config.postgres.clone())?;
        Ok(Self::new(postgres, drive, ocr, embeddings).with_max_concurrent_jobs(config.max_concurrent_jobs))
    }
}
