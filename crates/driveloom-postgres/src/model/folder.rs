//! Folder model.

use diesel::prelude::*;
use driveloom_core::types::Folder;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::folders;
use crate::types::{DbFolderStatus, HasCreatedAt, HasUpdatedAt};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = folders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DbFolder {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub remote_folder_id: String,
    pub name: String,
    pub status: DbFolderStatus,
    pub files_total: i32,
    pub files_indexed: i32,
    pub last_synced_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = folders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDbFolder {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub remote_folder_id: String,
    pub name: String,
    pub status: DbFolderStatus,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = folders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateDbFolder {
    pub name: Option<String>,
    pub status: Option<DbFolderStatus>,
    pub files_total: Option<i32>,
    pub files_indexed: Option<i32>,
    pub last_synced_at: Option<Timestamp>,
}

impl From<DbFolder> for Folder {
    fn from(row: DbFolder) -> Self {
        Folder {
            id: row.id,
            tenant_id: row.tenant_id,
            remote_folder_id: row.remote_folder_id,
            name: row.name,
            status: row.status.into(),
            files_total: row.files_total,
            files_indexed: row.files_indexed,
            last_synced_at: row.last_synced_at.map(Into::into),
            created_at: row.created_at.into(),
            updated_at: row.updated_at.into(),
        }
    }
}

impl HasCreatedAt for DbFolder {
    fn created_at(&self) -> jiff::Timestamp {
        self.created_at.into()
    }
}

impl HasUpdatedAt for DbFolder {
    fn updated_at(&self) -> jiff::Timestamp {
        self.updated_at.into()
    }
}
