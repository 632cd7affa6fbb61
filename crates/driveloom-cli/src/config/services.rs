//! Per-service CLI settings, converted into the plain config structs each
//! crate exposes (`driveloom-drive::GoogleDriveConfig`,
//! `driveloom-embeddings::HttpEmbeddingConfig`, and so on). Each settings
//! struct derives `clap::Args` and exposes a conversion method so the
//! plain config types never need to know about clap themselves.

use std::time::Duration;

use clap::Args;
use driveloom_chat::HttpGeneratorConfig;
use driveloom_drive::GoogleDriveConfig;
use driveloom_embeddings::HttpEmbeddingConfig;
use driveloom_extraction::HttpOcrConfig;
use driveloom_search::HttpRerankConfig;
use driveloom_sync::SyncConfig;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceSettings {
    #[clap(flatten)]
    pub drive: DriveSettings,

    /// Base URL of the dense-embedding HTTP service.
    #[arg(long, env = "EMBEDDING_BASE_URL")]
    pub embedding_base_url: Url,
    #[arg(long, env = "EMBEDDING_API_KEY")]
    pub embedding_api_key: String,

    /// Base URL of the remote OCR HTTP service.
    #[arg(long, env = "OCR_BASE_URL")]
    pub ocr_base_url: Url,
    #[arg(long, env = "OCR_API_KEY")]
    pub ocr_api_key: String,

    #[clap(flatten)]
    pub generator: GeneratorSettings,

    #[clap(flatten)]
    pub rerank: RerankSettings,

    #[clap(flatten)]
    pub indexing: IndexingSettings,

    #[clap(flatten)]
    pub sync: SyncSettings,
}

impl ServiceSettings {
    pub fn embedding_config(&self) -> HttpEmbeddingConfig {
        HttpEmbeddingConfig::new(self.embedding_base_url.clone(), self.embedding_api_key.clone())
    }

    pub fn ocr_config(&self) -> HttpOcrConfig {
        HttpOcrConfig::new(self.ocr_base_url.clone(), self.ocr_api_key.clone())
    }
}

#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct DriveSettings {
    /// Root path the drive provider resolves folder/file ids under.
    #[arg(long, env = "DRIVE_ROOT", default_value = "/")]
    pub drive_root: String,
    #[arg(long, env = "DRIVE_ACCESS_TOKEN")]
    pub drive_access_token: String,
}

impl DriveSettings {
    pub fn drive_config(&self) -> GoogleDriveConfig {
        GoogleDriveConfig::new(self.drive_root.clone(), self.drive_access_token.clone())
    }
}

#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct GeneratorSettings {
    #[arg(long, env = "GENERATOR_BASE_URL")]
    pub generator_base_url: Url,
    #[arg(long, env = "GENERATOR_API_KEY")]
    pub generator_api_key: String,
}

impl GeneratorSettings {
    pub fn generator_config(&self) -> HttpGeneratorConfig {
        HttpGeneratorConfig::new(self.generator_base_url.clone(), self.generator_api_key.clone())
    }
}

/// Reranking is optional (`SPEC_FULL.md` §4.G "rerank failures degrade
/// gracefully"); omitting both flags disables it entirely.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct RerankSettings {
    #[arg(long, env = "RERANK_BASE_URL")]
    pub rerank_base_url: Option<Url>,
    #[arg(long, env = "RERANK_API_KEY")]
    pub rerank_api_key: Option<String>,
}

impl RerankSettings {
    pub fn rerank_config(&self) -> Option<HttpRerankConfig> {
        let base_url = self.rerank_base_url.clone()?;
        let api_key = self.rerank_api_key.clone().unwrap_or_default();
        Some(HttpRerankConfig::new(base_url, api_key))
    }
}

#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct IndexingSettings {
    #[arg(long, env = "MAX_CONCURRENT_JOBS")]
    pub max_concurrent_jobs: Option<usize>,
    #[arg(long, env = "INDEXING_POLL_INTERVAL_MS")]
    pub indexing_poll_interval_ms: Option<u64>,
    #[arg(long, env = "CONTEXTUAL_CHUNKING_ENABLED")]
    pub contextual_chunking_enabled: bool,
}

#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct SyncSettings {
    #[arg(long, env = "SYNC_STALE_AFTER_SECS")]
    pub sync_stale_after_secs: Option<u64>,
    #[arg(long, env = "SYNC_BACKOFF_BASE_MS")]
    pub sync_backoff_base_ms: Option<u64>,
    #[arg(long, env = "SYNC_MAX_BACKOFF_ATTEMPTS")]
    pub sync_max_backoff_attempts: Option<u32>,
}

impl SyncSettings {
    pub fn sync_config(&self) -> SyncConfig {
        let mut config = SyncConfig::default();
        if let Some(secs) = self.sync_stale_after_secs {
            config.stale_after_secs = secs;
        }
        if let Some(ms) = self.sync_backoff_base_ms {
            config.backoff_base_ms = ms;
        }
        if let Some(attempts) = self.sync_max_backoff_attempts {
            config.max_backoff_attempts = attempts;
        }
        config
    }
}

impl IndexingSettings {
    pub fn poll_interval(&self) -> Option<Duration> {
        self.indexing_poll_interval_ms.map(Duration::from_millis)
    }
}
