#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod adapter;
mod commands;
mod config;
mod telemetry;
mod wiring;

use std::process;

use config::{Cli, Command};

pub const TRACING_TARGET: &str = "driveloom_cli";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(target: TRACING_TARGET, error = %error, "command failed");
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

async fn run() -> anyhow::Result<()> {
    telemetry::init();

    let cli = Cli::init();
    let services = wiring::build(&cli)?;

    match cli.command {
        Command::Register { remote_folder_id, name } => {
            commands::register(&services.postgres, cli.tenant_id, &remote_folder_id, &name).await
        }
        Command::Sync { folder_id } => commands::sync(&services.synchronizer, folder_id).await,
        Command::Worker => commands::worker(services.worker_state, &cli.services.indexing).await,
        Command::Chat { folder_id, conversation_id, message, agent, max_iterations } => {
            commands::chat(&services.chat, folder_id, cli.tenant_id, conversation_id, message, agent, max_iterations).await
        }
    }
}
