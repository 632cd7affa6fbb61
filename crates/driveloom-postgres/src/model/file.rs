//! File model.

use diesel::prelude::*;
use driveloom_core::types::File;
use jiff_diesel::Timestamp;
use pgvector::Vector;
use uuid::Uuid;

use crate::schema::files;
use crate::types::{DbFileIndexStatus, HasCreatedAt, HasUpdatedAt};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = files)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DbFile {
    pub id: Uuid,
    pub folder_id: Uuid,
    pub tenant_id: Uuid,
    pub remote_file_id: String,
    pub name: String,
    pub mime_type: String,
    pub remote_modified_at: Timestamp,
    pub status: DbFileIndexStatus,
    pub preview: Option<String>,
    pub embedding: Option<Vector>,
    pub content_sha256: Option<Vec<u8>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = files)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDbFile {
    pub id: Uuid,
    pub folder_id: Uuid,
    pub tenant_id: Uuid,
    pub remote_file_id: String,
    pub name: String,
    pub mime_type: String,
    pub remote_modified_at: Timestamp,
    pub status: DbFileIndexStatus,
}

/// Partial update, used both by the synchronizer (name/mime/modified_time
/// bumps) and by the indexing worker (status/preview/embedding/hash writes).
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = files)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateDbFile {
    pub name: Option<String>,
    pub mime_type: Option<String>,
    pub remote_modified_at: Option<Timestamp>,
    pub status: Option<DbFileIndexStatus>,
    pub preview: Option<Option<String>>,
    pub embedding: Option<Option<Vector>>,
    pub content_sha256: Option<Option<Vec<u8>>>,
}

impl From<DbFile> for File {
    fn from(row: DbFile) -> Self {
        File {
            id: row.id,
            folder_id: row.folder_id,
            tenant_id: row.tenant_id,
            remote_file_id: row.remote_file_id,
            name: row.name,
            mime_type: row.mime_type,
            remote_modified_at: row.remote_modified_at.into(),
            status: row.status.into(),
            preview: row.preview,
            embedding: row.embedding.map(|v| v.to_vec()),
            content_sha256: row.content_sha256,
            created_at: row.created_at.into(),
            updated_at: row.updated_at.into(),
        }
    }
}

impl HasCreatedAt for DbFile {
    fn created_at(&self) -> jiff::Timestamp {
        self.created_at.into()
    }
}

impl HasUpdatedAt for DbFile {
    fn updated_at(&self) -> jiff::Timestamp {
        self.updated_at.into()
    }
}
