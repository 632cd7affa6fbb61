// @generated in spirit: hand-maintained to track migrations/ exactly.

pub mod sql_types {
    #[derive(diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "folder_status"))]
    pub struct FolderStatus;

    #[derive(diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "file_index_status"))]
    pub struct FileIndexStatus;

    #[derive(diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "job_status"))]
    pub struct JobStatus;

    #[derive(diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "message_role"))]
    pub struct MessageRole;

    /// Maps to Postgres' native `tsvector` type. The query builder only ever
    /// reads this column through raw SQL fragments (`diesel::dsl::sql`), so
    /// no `ToSql`/`FromSql` impl is needed.
    #[derive(diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "tsvector"))]
    pub struct TsVector;
}

diesel::table! {
    use diesel::sql_types::*;
    use pgvector::sql_types::Vector;
    use super::sql_types::FolderStatus;

    folders (id) {
        id -> Uuid,
        tenant_id -> Uuid,
        remote_folder_id -> Text,
        name -> Text,
        status -> FolderStatus,
        files_total -> Int4,
        files_indexed -> Int4,
        last_synced_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use pgvector::sql_types::Vector;
    use super::sql_types::FileIndexStatus;

    files (id) {
        id -> Uuid,
        folder_id -> Uuid,
        tenant_id -> Uuid,
        remote_file_id -> Text,
        name -> Text,
        mime_type -> Text,
        remote_modified_at -> Timestamptz,
        status -> FileIndexStatus,
        preview -> Nullable<Text>,
        embedding -> Nullable<Vector>,
        content_sha256 -> Nullable<Bytea>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use pgvector::sql_types::Vector;
    use super::sql_types::TsVector;

    chunks (id) {
        id -> Uuid,
        file_id -> Uuid,
        tenant_id -> Uuid,
        chunk_index -> Int4,
        text -> Text,
        location -> Jsonb,
        embedding -> Vector,
        content_sha256 -> Bytea,
        token_count -> Int4,
        text_search -> TsVector,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::JobStatus;

    indexing_jobs (id) {
        id -> Uuid,
        file_id -> Uuid,
        folder_id -> Uuid,
        status -> JobStatus,
        priority -> Int4,
        attempts -> Int4,
        max_attempts -> Int4,
        last_error -> Nullable<Text>,
        next_attempt_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        started_at -> Nullable<Timestamptz>,
        completed_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    conversations (id) {
        id -> Uuid,
        folder_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::MessageRole;

    messages (id) {
        id -> Uuid,
        conversation_id -> Uuid,
        role -> MessageRole,
        content -> Text,
        citations -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(files -> folders (folder_id));
diesel::joinable!(chunks -> files (file_id));
diesel::joinable!(indexing_jobs -> files (file_id));
diesel::joinable!(indexing_jobs -> folders (folder_id));
diesel::joinable!(conversations -> folders (folder_id));
diesel::joinable!(messages -> conversations (conversation_id));

diesel::allow_tables_to_appear_in_same_query!(
    folders,
    files,
    chunks,
    indexing_jobs,
    conversations,
    messages,
);
