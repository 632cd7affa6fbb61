//! Folder repository (`SPEC_FULL.md` §4.A).

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use driveloom_core::types::{Folder, FolderStatus};
use uuid::Uuid;

use crate::model::{DbFolder, NewDbFolder, UpdateDbFolder};
use crate::types::DbFolderStatus;
use crate::{PgConnection, PgError, PgResult, schema};

pub trait FolderRepository {
    /// Registers a new folder to watch, or returns the existing one if the
    /// tenant has already registered this remote folder id.
    fn register_folder(
        &mut self,
        tenant_id: Uuid,
        remote_folder_id: &str,
        name: &str,
    ) -> impl Future<Output = PgResult<Folder>> + Send;

    fn find_folder(&mut self, folder_id: Uuid) -> impl Future<Output = PgResult<Folder>> + Send;

    /// Tenant-scoped lookup; returns [`PgError::NotFound`] for both a
    /// missing folder and one owned by a different tenant
    /// (`SPEC_FULL.md` §6 "access denied is indistinguishable from not found").
    fn find_folder_scoped(
        &mut self,
        folder_id: Uuid,
        tenant_id: Uuid,
    ) -> impl Future<Output = PgResult<Folder>> + Send;

    fn update_folder_status(
        &mut self,
        folder_id: Uuid,
        status: FolderStatus,
    ) -> impl Future<Output = PgResult<Folder>> + Send;

    /// Bumps `files_total`/`files_indexed` counters and, when the
    /// synchronizer finishes a pass, `last_synced_at`. `files_failed` drives
    /// the *ready* vs *failed* transition (`spec.md` §4.F folder status
    /// state machine) without being persisted as its own column.
    fn update_folder_progress(
        &mut self,
        folder_id: Uuid,
        files_total: i32,
        files_indexed: i32,
        files_failed: i32,
        synced: bool,
    ) -> impl Future<Output = PgResult<Folder>> + Send;
}

impl FolderRepository for PgConnection {
    async fn register_folder(
        &mut self,
        tenant_id: Uuid,
        remote_folder_id: &str,
        name: &str,
    ) -> PgResult<Folder> {
        use schema::folders::dsl;

        let existing: Option<DbFolder> = schema::folders::table
            .filter(dsl::tenant_id.eq(tenant_id))
            .filter(dsl::remote_folder_id.eq(remote_folder_id))
            .select(DbFolder::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        if let Some(folder) = existing {
            return Ok(folder.into());
        }

        let new_folder = NewDbFolder {
            id: Uuid::now_v7(),
            tenant_id,
            remote_folder_id: remote_folder_id.to_owned(),
            name: name.to_owned(),
            status: DbFolderStatus::Pending,
        };

        let row = diesel::insert_into(schema::folders::table)
            .values(&new_folder)
            .returning(DbFolder::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(row.into())
    }

    async fn find_folder(&mut self, folder_id: Uuid) -> PgResult<Folder> {
        use schema::folders::dsl;

        let row = schema::folders::table
            .filter(dsl::id.eq(folder_id))
            .select(DbFolder::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)?;

        Ok(row.into())
    }

    async fn find_folder_scoped(&mut self, folder_id: Uuid, tenant_id: Uuid) -> PgResult<Folder> {
        use schema::folders::dsl;

        let row = schema::folders::table
            .filter(dsl::id.eq(folder_id))
            .filter(dsl::tenant_id.eq(tenant_id))
            .select(DbFolder::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)?;

        Ok(row.into())
    }

    async fn update_folder_status(&mut self, folder_id: Uuid, status: FolderStatus) -> PgResult<Folder> {
        use schema::folders::dsl;

        let updates = UpdateDbFolder {
            status: Some(status.into()),
            ..Default::default()
        };

        let row = diesel::update(schema::folders::table.filter(dsl::id.eq(folder_id)))
            .set(&updates)
            .returning(DbFolder::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(row.into())
    }

    async fn update_folder_progress(
        &mut self,
        folder_id: Uuid,
        files_total: i32,
        files_indexed: i32,
        files_failed: i32,
        synced: bool,
    ) -> PgResult<Folder> {
        use schema::folders::dsl;

        // `spec.md` §4.F: ready requires every file terminal with none
        // failed; failed requires every file terminal with at least one
        // failure; otherwise the folder is still indexing.
        let settled = files_total == 0 || files_indexed + files_failed >= files_total;
        let status = if !settled {
            DbFolderStatus::Indexing
        } else if files_failed > 0 {
            DbFolderStatus::Failed
        } else {
            DbFolderStatus::Ready
        };

        let updates = UpdateDbFolder {
            files_total: Some(files_total),
            files_indexed: Some(files_indexed),
            status: Some(status),
            last_synced_at: if synced { Some(jiff_diesel::Timestamp::from(jiff::Timestamp::now())) } else { None },
            ..Default::default()
        };

        let row = diesel::update(schema::folders::table.filter(dsl::id.eq(folder_id)))
            .set(&updates)
            .returning(DbFolder::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(row.into())
    }
}
