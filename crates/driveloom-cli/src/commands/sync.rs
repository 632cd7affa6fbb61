use driveloom_sync::Synchronizer;
use uuid::Uuid;

pub async fn run(synchronizer: &Synchronizer, folder_id: Uuid) -> anyhow::Result<()> {
    let outcome = synchronizer.sync_folder(folder_id).await?;

    println!(
        "sync complete: {} added, {} modified, {} deleted",
        outcome.added, outcome.modified, outcome.deleted
    );
    Ok(())
}
