//! Chunk model.
//!
//! `location` is stored as `jsonb` (serde round-trip of
//! `driveloom_core::types::Location`) and `text_search` is a generated
//! `tsvector` column maintained by Postgres, never written from Rust.

use diesel::prelude::*;
use driveloom_core::types::{Chunk, Location};
use jiff_diesel::Timestamp;
use pgvector::Vector;
use uuid::Uuid;

use crate::schema::chunks;
use crate::{PgError, PgResult};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DbChunk {
    pub id: Uuid,
    pub file_id: Uuid,
    pub tenant_id: Uuid,
    pub chunk_index: i32,
    pub text: String,
    pub location: serde_json::Value,
    pub embedding: Vector,
    pub content_sha256: Vec<u8>,
    pub token_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDbChunk {
    pub id: Uuid,
    pub file_id: Uuid,
    pub tenant_id: Uuid,
    pub chunk_index: i32,
    pub text: String,
    pub location: serde_json::Value,
    pub embedding: Vector,
    pub content_sha256: Vec<u8>,
    pub token_count: i32,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateDbChunk {
    pub embedding: Option<Vector>,
}

impl NewDbChunk {
    pub fn from_domain(chunk: &Chunk) -> PgResult<Self> {
        Ok(Self {
            id: chunk.id,
            file_id: chunk.file_id,
            tenant_id: chunk.tenant_id,
            chunk_index: chunk.chunk_index,
            text: chunk.text.clone(),
            location: serde_json::to_value(&chunk.location)
                .map_err(|e| PgError::Unexpected(e.to_string().into()))?,
            embedding: Vector::from(chunk.embedding.clone()),
            content_sha256: chunk.content_sha256.to_vec(),
            token_count: chunk.token_count,
        })
    }
}

impl TryFrom<DbChunk> for Chunk {
    type Error = PgError;

    fn try_from(row: DbChunk) -> Result<Self, Self::Error> {
        let location: Location = serde_json::from_value(row.location)
            .map_err(|e| PgError::Unexpected(e.to_string().into()))?;
        let content_sha256: [u8; 32] = row
            .content_sha256
            .try_into()
            .map_err(|_| PgError::Unexpected("chunk content_sha256 is not 32 bytes".into()))?;

        Ok(Chunk {
            id: row.id,
            file_id: row.file_id,
            tenant_id: row.tenant_id,
            chunk_index: row.chunk_index,
            text: row.text,
            location,
            embedding: row.embedding.to_vec(),
            content_sha256,
            token_count: row.token_count,
            created_at: row.created_at.into(),
            updated_at: row.updated_at.into(),
        })
    }
}
