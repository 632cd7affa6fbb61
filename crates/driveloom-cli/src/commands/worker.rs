use driveloom_indexing::{DEFAULT_POLL_INTERVAL, IndexingWorker, WorkerState};
use tokio_util::sync::CancellationToken;

use crate::config::IndexingSettings;

/// Runs the indexing worker pool until interrupted with Ctrl-C
/// (`SPEC_FULL.md` §4.F).
pub async fn run(state: WorkerState, settings: &IndexingSettings) -> anyhow::Result<()> {
    let poll_interval = settings.poll_interval().unwrap_or(DEFAULT_POLL_INTERVAL);
    let cancel_token = CancellationToken::new();

    let worker = IndexingWorker::new(state, "driveloom-cli", poll_interval, cancel_token.clone());
    let handle = worker.spawn();

    tracing::info!(target: "driveloom_cli", "indexing worker started, press ctrl-c to stop");
    tokio::signal::ctrl_c().await?;

    cancel_token.cancel();
    handle.await?;

    Ok(())
}
