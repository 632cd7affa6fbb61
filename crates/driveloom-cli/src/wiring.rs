//! Service construction: builds every shared client once from parsed
//! configuration and hands the pieces each subcommand needs.

use std::sync::Arc;

use driveloom_chat::{ChatService, HttpGeneratorProvider};
use driveloom_drive::{DriveProvider, GoogleDriveProvider};
use driveloom_embeddings::{ContextAugmenter, EmbeddingProvider, HttpEmbeddingProvider};
use driveloom_extraction::{HttpOcrProvider, OcrProvider};
use driveloom_indexing::WorkerState;
use driveloom_postgres::PgClient;
use driveloom_search::{HttpRerankProvider, Retriever};
use driveloom_sync::Synchronizer;

use crate::adapter::AugmenterGenerator;
use crate::config::Cli;

pub struct Services {
    pub postgres: PgClient,
    pub chat: ChatService,
    pub synchronizer: Synchronizer,
    pub worker_state: WorkerState,
}

pub fn build(cli: &Cli) -> anyhow::Result<Services> {
    let postgres = PgClient::new(cli.postgres.clone())?;

    let drive: Arc<dyn DriveProvider> = Arc::new(GoogleDriveProvider::new(cli.services.drive.drive_config())?);
    let embeddings: Arc<dyn EmbeddingProvider> = Arc::new(HttpEmbeddingProvider::new(cli.services.embedding_config())?);
    let ocr: Arc<dyn OcrProvider> = Arc::new(HttpOcrProvider::new(cli.services.ocr_config())?);
    let generator: Arc<dyn driveloom_chat::GeneratorProvider> =
        Arc::new(HttpGeneratorProvider::new(cli.services.generator.generator_config())?);

    let mut retriever = Retriever::new(postgres.clone(), Arc::clone(&embeddings));
    if let Some(rerank_config) = cli.services.rerank.rerank_config() {
        let reranker: Arc<dyn driveloom_search::RerankProvider> = Arc::new(HttpRerankProvider::new(rerank_config)?);
        retriever = retriever.with_reranker(reranker);
    }

    let chat = ChatService::new(postgres.clone(), Arc::new(retriever), generator.clone());

    let synchronizer = Synchronizer::new(postgres.clone(), Arc::clone(&drive)).with_config(cli.services.sync.sync_config());

    let mut worker_state = WorkerState::new(postgres.clone(), drive, ocr, embeddings);
    if cli.services.indexing.contextual_chunking_enabled {
        let augmenter_generator = Arc::new(AugmenterGenerator::new(generator));
        worker_state = worker_state.with_augmenter(Arc::new(ContextAugmenter::new(augmenter_generator)));
    }
    if let Some(max_concurrent_jobs) = cli.services.indexing.max_concurrent_jobs {
        worker_state = worker_state.with_max_concurrent_jobs(max_concurrent_jobs);
    }

    Ok(Services { postgres, chat, synchronizer, worker_state })
}
