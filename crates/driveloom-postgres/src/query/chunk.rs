//! Chunk repository: batch replace and the two retrieval signals backing
//! the hybrid retriever (`SPEC_FULL.md` §4.G).

use std::future::Future;

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{Double, Text};
use diesel_async::{AsyncConnection, RunQueryDsl};
use driveloom_core::types::Chunk;
use pgvector::{Vector, VectorExpressionMethods};
use uuid::Uuid;

use crate::model::{DbChunk, NewDbChunk};
use crate::{PgConnection, PgError, PgResult, schema};

/// One hit from the dense vector signal: cosine distance, smaller is closer.
pub struct VectorHit {
    pub chunk: Chunk,
    pub distance: f64,
}

/// One hit from the lexical signal: Postgres' `ts_rank`, larger is stronger.
pub struct LexicalHit {
    pub chunk: Chunk,
    pub rank: f64,
}

pub trait ChunkRepository {
    /// Replaces every chunk for a file in a single transaction: deletes the
    /// file's existing chunks, then inserts the new set
    /// (`SPEC_FULL.md` §4.A "single-transaction batch replace"; a crash
    /// mid-replace must never leave partial chunks).
    fn replace_chunks(
        &mut self,
        file_id: Uuid,
        chunks: &[Chunk],
    ) -> impl Future<Output = PgResult<Vec<Chunk>>> + Send;

    fn list_chunks_for_file(
        &mut self,
        file_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<Chunk>>> + Send;

    fn count_chunks_for_folder(
        &mut self,
        folder_id: Uuid,
    ) -> impl Future<Output = PgResult<i64>> + Send;

    /// Nearest neighbors by cosine distance, scoped to one tenant's folder
    /// (`SPEC_FULL.md` §4.G candidate pool, vector signal).
    fn search_vector(
        &mut self,
        folder_id: Uuid,
        tenant_id: Uuid,
        query_embedding: &[f32],
        limit: i64,
    ) -> impl Future<Output = PgResult<Vec<VectorHit>>> + Send;

    /// Full-text search over the generated `text_search` column via
    /// `plainto_tsquery`, scoped to one tenant's folder
    /// (`SPEC_FULL.md` §4.G candidate pool, lexical signal).
    fn search_lexical(
        &mut self,
        folder_id: Uuid,
        tenant_id: Uuid,
        query_text: &str,
        limit: i64,
    ) -> impl Future<Output = PgResult<Vec<LexicalHit>>> + Send;

    fn find_chunk_scoped(
        &mut self,
        chunk_id: Uuid,
        tenant_id: Uuid,
    ) -> impl Future<Output = PgResult<Chunk>> + Send;
}

impl ChunkRepository for PgConnection {
    async fn replace_chunks(&mut self, file_id: Uuid, chunks: &[Chunk]) -> PgResult<Vec<Chunk>> {
        use schema::chunks::dsl;

        let new_rows = chunks
            .iter()
            .map(NewDbChunk::from_domain)
            .collect::<PgResult<Vec<_>>>()?;

        let inserted: Vec<DbChunk> = self
            .transaction::<_, PgError, _>(|conn| {
                Box::pin(async move {
                    diesel::delete(schema::chunks::table.filter(dsl::file_id.eq(file_id)))
                        .execute(conn)
                        .await
                        .map_err(PgError::from)?;

                    if new_rows.is_empty() {
                        return Ok(vec![]);
                    }

                    diesel::insert_into(schema::chunks::table)
                        .values(&new_rows)
                        .returning(DbChunk::as_returning())
                        .get_results(conn)
                        .await
                        .map_err(PgError::from)
                })
            })
            .await?;

        inserted.into_iter().map(TryFrom::try_from).collect()
    }

    async fn list_chunks_for_file(&mut self, file_id: Uuid) -> PgResult<Vec<Chunk>> {
        use schema::chunks::dsl;

        let rows: Vec<DbChunk> = schema::chunks::table
            .filter(dsl::file_id.eq(file_id))
            .order(dsl::chunk_index.asc())
            .select(DbChunk::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        rows.into_iter().map(TryFrom::try_from).collect()
    }

    async fn count_chunks_for_folder(&mut self, folder_id: Uuid) -> PgResult<i64> {
        use schema::chunks::dsl;
        use schema::files;

        let count = schema::chunks::table
            .inner_join(files::table.on(files::id.eq(dsl::file_id)))
            .filter(files::folder_id.eq(folder_id))
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(count)
    }

    async fn search_vector(
        &mut self,
        folder_id: Uuid,
        tenant_id: Uuid,
        query_embedding: &[f32],
        limit: i64,
    ) -> PgResult<Vec<VectorHit>> {
        use schema::chunks::dsl;
        use schema::files;

        let query = Vector::from(query_embedding.to_vec());

        let rows: Vec<(DbChunk, f64)> = schema::chunks::table
            .inner_join(files::table.on(files::id.eq(dsl::file_id)))
            .filter(files::folder_id.eq(folder_id))
            .filter(dsl::tenant_id.eq(tenant_id))
            .order(dsl::embedding.cosine_distance(&query))
            .limit(limit)
            .select((
                DbChunk::as_select(),
                dsl::embedding.cosine_distance(&query),
            ))
            .load(self)
            .await
            .map_err(PgError::from)?;

        rows.into_iter()
            .map(|(row, distance)| Ok(VectorHit { chunk: row.try_into()?, distance }))
            .collect()
    }

    async fn search_lexical(
        &mut self,
        folder_id: Uuid,
        tenant_id: Uuid,
        query_text: &str,
        limit: i64,
    ) -> PgResult<Vec<LexicalHit>> {
        use schema::chunks::dsl;
        use schema::files;

        // `plainto_tsquery` tokenizes and stems the raw query text, matching
        // the generated `text_search` column built the same way in
        // migrations/.../up.sql.
        let rank_for_order = sql::<Double>("ts_rank(chunks.text_search, plainto_tsquery('english', ")
            .bind::<Text, _>(query_text.to_owned())
            .sql("))");
        let rank_for_select = sql::<Double>("ts_rank(chunks.text_search, plainto_tsquery('english', ")
            .bind::<Text, _>(query_text.to_owned())
            .sql("))");
        let match_expr = sql::<diesel::sql_types::Bool>(
            "chunks.text_search @@ plainto_tsquery('english', ",
        )
        .bind::<Text, _>(query_text.to_owned())
        .sql(")");

        let rows: Vec<(DbChunk, f64)> = schema::chunks::table
            .inner_join(files::table.on(files::id.eq(dsl::file_id)))
            .filter(files::folder_id.eq(folder_id))
            .filter(dsl::tenant_id.eq(tenant_id))
            .filter(match_expr)
            .order(rank_for_order.desc())
            .limit(limit)
            .select((DbChunk::as_select(), rank_for_select))
            .load(self)
            .await
            .map_err(PgError::from)?;

        rows.into_iter()
            .map(|(row, rank)| Ok(LexicalHit { chunk: row.try_into()?, rank }))
            .collect()
    }

    async fn find_chunk_scoped(&mut self, chunk_id: Uuid, tenant_id: Uuid) -> PgResult<Chunk> {
        use schema::chunks::dsl;

        let row: DbChunk = schema::chunks::table
            .filter(dsl::id.eq(chunk_id))
            .filter(dsl::tenant_id.eq(tenant_id))
            .select(DbChunk::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)?;

        row.try_into()
    }
}
