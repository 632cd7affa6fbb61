//! File repository (`SPEC_FULL.md` §4.A, §4.I).

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use driveloom_core::types::{File, FileIndexStatus};
use jiff_diesel::Timestamp;
use pgvector::Vector;
use uuid::Uuid;

use crate::model::{DbFile, NewDbFile, UpdateDbFile};
use crate::types::DbFileIndexStatus;
use crate::{PgConnection, PgError, PgResult, schema};

pub trait FileRepository {
    /// Inserts a file discovered by the synchronizer, or updates its name,
    /// mime type, and `remote_modified_at` if it already exists
    /// (`SPEC_FULL.md` §4.I "diff computation").
    fn upsert_file(
        &mut self,
        folder_id: Uuid,
        tenant_id: Uuid,
        remote_file_id: &str,
        name: &str,
        mime_type: &str,
        remote_modified_at: jiff::Timestamp,
    ) -> impl Future<Output = PgResult<(File, bool)>> + Send;

    fn find_file(&mut self, file_id: Uuid) -> impl Future<Output = PgResult<File>> + Send;

    fn find_file_scoped(
        &mut self,
        file_id: Uuid,
        tenant_id: Uuid,
    ) -> impl Future<Output = PgResult<File>> + Send;

    fn list_files_for_folder(
        &mut self,
        folder_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<File>>> + Send;

    /// Batch lookup backing the hybrid retriever's enrichment pass
    /// (`SPEC_FULL.md` §4.G "each with its owning file's display name ...");
    /// order is unspecified, callers index the result by `File::id`.
    fn find_files_by_ids(
        &mut self,
        file_ids: &[Uuid],
    ) -> impl Future<Output = PgResult<Vec<File>>> + Send;

    fn update_file_status(
        &mut self,
        file_id: Uuid,
        status: FileIndexStatus,
    ) -> impl Future<Output = PgResult<File>> + Send;

    /// Writes the file-level preview/embedding/hash produced by the
    /// indexing worker and marks the file `Completed`
    /// (`SPEC_FULL.md` §4.F).
    fn complete_file_indexing(
        &mut self,
        file_id: Uuid,
        preview: String,
        embedding: Vec<f32>,
        content_sha256: Vec<u8>,
    ) -> impl Future<Output = PgResult<File>> + Send;

    /// Clears the preview/embedding so a modified file no longer serves
    /// stale retrieval results while its job is in flight
    /// (`SPEC_FULL.md` §4.I "chunk/embedding nulling on modify").
    fn clear_file_index_state(
        &mut self,
        file_id: Uuid,
    ) -> impl Future<Output = PgResult<File>> + Send;

    fn delete_file(&mut self, file_id: Uuid) -> impl Future<Output = PgResult<()>> + Send;
}

impl FileRepository for PgConnection {
    async fn upsert_file(
        &mut self,
        folder_id: Uuid,
        tenant_id: Uuid,
        remote_file_id: &str,
        name: &str,
        mime_type: &str,
        remote_modified_at: jiff::Timestamp,
    ) -> PgResult<(File, bool)> {
        use schema::files::dsl;

        let existing: Option<DbFile> = schema::files::table
            .filter(dsl::folder_id.eq(folder_id))
            .filter(dsl::remote_file_id.eq(remote_file_id))
            .select(DbFile::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        if let Some(row) = existing {
            if row.remote_modified_at == Timestamp::from(remote_modified_at) {
                return Ok((row.into(), false));
            }

            let updates = UpdateDbFile {
                name: Some(name.to_owned()),
                mime_type: Some(mime_type.to_owned()),
                remote_modified_at: Some(Timestamp::from(remote_modified_at)),
                status: Some(DbFileIndexStatus::Pending),
                preview: Some(None),
                embedding: Some(None),
                content_sha256: Some(None),
            };

            let updated = diesel::update(schema::files::table.filter(dsl::id.eq(row.id)))
                .set(&updates)
                .returning(DbFile::as_returning())
                .get_result(self)
                .await
                .map_err(PgError::from)?;

            return Ok((updated.into(), true));
        }

        let new_file = NewDbFile {
            id: Uuid::now_v7(),
            folder_id,
            tenant_id,
            remote_file_id: remote_file_id.to_owned(),
            name: name.to_owned(),
            mime_type: mime_type.to_owned(),
            remote_modified_at: Timestamp::from(remote_modified_at),
            status: DbFileIndexStatus::Pending,
        };

        let row = diesel::insert_into(schema::files::table)
            .values(&new_file)
            .returning(DbFile::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok((row.into(), true))
    }

    async fn find_file(&mut self, file_id: Uuid) -> PgResult<File> {
        use schema::files::dsl;

        let row = schema::files::table
            .filter(dsl::id.eq(file_id))
            .select(DbFile::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)?;

        Ok(row.into())
    }

    async fn find_file_scoped(&mut self, file_id: Uuid, tenant_id: Uuid) -> PgResult<File> {
        use schema::files::dsl;

        let row = schema::files::table
            .filter(dsl::id.eq(file_id))
            .filter(dsl::tenant_id.eq(tenant_id))
            .select(DbFile::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)?;

        Ok(row.into())
    }

    async fn list_files_for_folder(&mut self, folder_id: Uuid) -> PgResult<Vec<File>> {
        use schema::files::dsl;

        let rows = schema::files::table
            .filter(dsl::folder_id.eq(folder_id))
            .order(dsl::name.asc())
            .select(DbFile::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_files_by_ids(&mut self, file_ids: &[Uuid]) -> PgResult<Vec<File>> {
        use schema::files::dsl;

        if file_ids.is_empty() {
            return Ok(vec![]);
        }

        let rows = schema::files::table
            .filter(dsl::id.eq_any(file_ids))
            .select(DbFile::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_file_status(&mut self, file_id: Uuid, status: FileIndexStatus) -> PgResult<File> {
        use schema::files::dsl;

        let updates = UpdateDbFile {
            status: Some(status.into()),
            ..Default::default()
        };

        let row = diesel::update(schema::files::table.filter(dsl::id.eq(file_id)))
            .set(&updates)
            .returning(DbFile::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(row.into())
    }

    async fn complete_file_indexing(
        &mut self,
        file_id: Uuid,
        preview: String,
        embedding: Vec<f32>,
        content_sha256: Vec<u8>,
    ) -> PgResult<File> {
        use schema::files::dsl;

        let updates = UpdateDbFile {
            status: Some(DbFileIndexStatus::Completed),
            preview: Some(Some(preview)),
            embedding: Some(Some(Vector::from(embedding))),
            content_sha256: Some(Some(content_sha256)),
            ..Default::default()
        };

        let row = diesel::update(schema::files::table.filter(dsl::id.eq(file_id)))
            .set(&updates)
            .returning(DbFile::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(row.into())
    }

    async fn clear_file_index_state(&mut self, file_id: Uuid) -> PgResult<File> {
        use schema::files::dsl;

        let updates = UpdateDbFile {
            status: Some(DbFileIndexStatus::Pending),
            preview: Some(None),
            embedding: Some(None),
            ..Default::default()
        };

        let row = diesel::update(schema::files::table.filter(dsl::id.eq(file_id)))
            .set(&updates)
            .returning(DbFile::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(row.into())
    }

    async fn delete_file(&mut self, file_id: Uuid) -> PgResult<()> {
        use schema::files::dsl;

        diesel::delete(schema::files::table.filter(dsl::id.eq(file_id)))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }
}
