//! CLI configuration: one `clap::Parser` struct combining the storage,
//! drive and AI-service connection settings every subcommand needs.

mod services;

use clap::{Parser, Subcommand};
use driveloom_postgres::PgConfig;
pub use services::{DriveSettings, GeneratorSettings, IndexingSettings, RerankSettings, ServiceSettings, SyncSettings};
use uuid::Uuid;

/// Top-level CLI configuration and subcommand dispatch.
#[derive(Debug, Parser)]
#[command(name = "driveloom")]
#[command(about = "Document-chat engine: sync a drive folder, index it, chat over it")]
#[command(version)]
pub struct Cli {
    /// Postgres connection and pool settings.
    #[clap(flatten)]
    pub postgres: PgConfig,

    /// Tenant scoping every command runs under.
    #[arg(long, env = "TENANT_ID")]
    pub tenant_id: Uuid,

    /// Google Drive, embedding, OCR and generator service settings.
    #[clap(flatten)]
    pub services: ServiceSettings,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads a `.env` file (if the `dotenv` feature is enabled) and parses
    /// CLI arguments, in that order so dotenv values can supply `clap`'s
    /// `env` defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Registers a drive folder for this tenant, or returns the existing
    /// registration if it has already been watched.
    Register {
        /// The folder id as it exists in the drive provider.
        #[arg(long)]
        remote_folder_id: String,
        /// Display name to store alongside the registration.
        #[arg(long)]
        name: String,
    },
    /// Runs one synchronization pass against a registered folder's
    /// current drive contents.
    Sync {
        #[arg(long)]
        folder_id: Uuid,
    },
    /// Starts the indexing worker pool, claiming and processing jobs
    /// until interrupted.
    Worker,
    /// Runs a single chat turn against a folder's indexed documents and
    /// prints the streamed answer.
    Chat {
        #[arg(long)]
        folder_id: Uuid,
        /// Existing conversation to continue; a new one is created if
        /// omitted.
        #[arg(long)]
        conversation_id: Option<Uuid>,
        #[arg(long)]
        message: String,
        /// Runs agentic mode (tool-use loop) instead of standard mode.
        #[arg(long)]
        agent: bool,
        /// Iteration cap for agentic mode.
        #[arg(long)]
        max_iterations: Option<u32>,
    },
}
