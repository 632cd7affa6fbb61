use driveloom_postgres::PgClient;
use driveloom_postgres::query::FolderRepository;
use uuid::Uuid;

pub async fn run(postgres: &PgClient, tenant_id: Uuid, remote_folder_id: &str, name: &str) -> anyhow::Result<()> {
    let mut conn = postgres.get_connection().await?;
    let folder = conn.register_folder(tenant_id, remote_folder_id, name).await?;

    println!("folder {} ({}) registered, status {:?}", folder.id, folder.name, folder.status);
    Ok(())
}
