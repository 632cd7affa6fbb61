//! One job's `fetch -> extract -> chunk -> embed -> store` pipeline
//! (`spec.md` §4.F "`process(job)` performs, in order: ...").

use driveloom_core::types::{Chunk, File, IndexingJob};
use driveloom_embeddings::DOCUMENT_PREFIX;
use driveloom_extraction::{Document, Extractor, ExtractorKind};
use driveloom_postgres::query::{ChunkRepository, FileRepository};
use jiff::Timestamp;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::TRACING_TARGET;
use crate::error::IndexingResult;
use crate::state::WorkerState;

/// Average characters per token for the rough token-count estimate stored
/// alongside each chunk; this workspace has no tokenizer dependency, so
/// `token_count` is an approximation, not an exact count.
const CHARS_PER_TOKEN_ESTIMATE: usize = 4;

fn estimate_token_count(text: &str) -> i32 {
    ((text.chars().count() + CHARS_PER_TOKEN_ESTIMATE - 1) / CHARS_PER_TOKEN_ESTIMATE) as i32
}

fn sha256(bytes: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().to_vec()
}

fn document_text(document: &Document) -> String {
    document.iter().map(|block| block.text.as_str()).collect::<Vec<_>>().join("\n\n")
}

/// Downloads a file's bytes in the form its extractor needs. Native
/// documents (Google Docs, `.docx`) are exported to Markdown first, since
/// `driveloom-extraction`'s native-document path parses heading-preserving
/// markup rather than binary document formats.
async fn fetch_for_extraction(state: &WorkerState, file: &File) -> IndexingResult<(Vec<u8>, String)> {
    match ExtractorKind::from_mime_type(&file.mime_type) {
        Some(ExtractorKind::NativeDocument) => {
            let bytes = state.drive.export_native(&file.remote_file_id, "text/markdown").await?;
            Ok((bytes, "text/markdown".to_owned()))
        }
        _ => {
            let bytes = state.drive.download(&file.remote_file_id).await?;
            Ok((bytes, file.mime_type.clone()))
        }
    }
}

/// Runs one job to completion, leaving the file's chunks replaced and its
/// preview/embedding set. The caller (the worker loop) is responsible for
/// translating a returned error into a retry or a terminal failure.
#[tracing::instrument(skip(state, job), fields(job_id = %job.id, file_id = %job.file_id), target = TRACING_TARGET)]
pub async fn process(state: &WorkerState, job: &IndexingJob) -> IndexingResult<()> {
    let mut conn = state.postgres.get_connection().await?;
    let file = conn.find_file(job.file_id).await?;
    conn.update_file_status(file.id, driveloom_core::types::FileIndexStatus::Indexing).await?;

    let (bytes, effective_mime) = fetch_for_extraction(state, &file).await?;
    let content_sha256 = sha256(&bytes);

    let extractor = Extractor::new(state.ocr.as_ref());
    let document = extractor.extract(&bytes, &effective_mime).await?;

    let drafts = state.chunker.chunk(&document);
    let preview = state.chunker.derive_preview(&document);

    tracing::debug!(
        target: crate::TRACING_TARGET,
        chunk_count = drafts.len(),
        preview_len = preview.len(),
        "extracted and chunked file"
    );

    let mut embedding_inputs: Vec<String> =
        drafts.iter().map(|draft| draft.text.clone()).collect();

    if let Some(augmenter) = &state.augmenter {
        let full_document = document_text(&document);
        embedding_inputs = augmenter.augment(&file.name, &full_document, &embedding_inputs).await;
    }

    let prefixed_inputs: Vec<String> =
        embedding_inputs.iter().map(|text| format!("{DOCUMENT_PREFIX}{text}")).collect();

    let chunk_vectors = if prefixed_inputs.is_empty() {
        Vec::new()
    } else {
        state.embeddings.embed_documents(&prefixed_inputs).await?
    };

    let now = Timestamp::now();
    let chunks: Vec<Chunk> = drafts
        .into_iter()
        .zip(chunk_vectors)
        .map(|(draft, embedding)| Chunk {
            id: Uuid::now_v7(),
            file_id: file.id,
            tenant_id: file.tenant_id,
            chunk_index: draft.chunk_index,
            content_sha256: Chunk::hash_text(&draft.text),
            token_count: estimate_token_count(&draft.text),
            location: draft.location,
            embedding,
            text: draft.text,
            created_at: now,
            updated_at: now,
        })
        .collect();

    conn.replace_chunks(file.id, &chunks).await?;

    let file_embedding_input = format!("{DOCUMENT_PREFIX}{preview}");
    let file_vector = state
        .embeddings
        .embed_documents(std::slice::from_ref(&file_embedding_input))
        .await?
        .into_iter()
        .next()
        .unwrap_or_default();

    conn.complete_file_indexing(file.id, preview, file_vector, content_sha256).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_estimate_rounds_up() {
        assert_eq!(estimate_token_count(""), 0);
        assert_eq!(estimate_token_count("abcd"), 1);
        assert_eq!(estimate_token_count("abcde"), 2);
    }

    #[test]
    fn document_text_joins_blocks_with_blank_lines() {
        use driveloom_core::types::Location;
        use driveloom_extraction::Block;

        let doc = vec![
            Block::new("first", Location::Doc { heading_path: String::new(), para_index: 0 }),
            Block::new("second", Location::Doc { heading_path: String::new(), para_index: 1 }),
        ];
        assert_eq!(document_text(&doc), "first\n\nsecond");
    }

    mod fetch_routing {
        use std::sync::{Arc, Mutex};

        use async_trait::async_trait;
        use driveloom_core::types::FileIndexStatus;
        use driveloom_drive::{DriveProvider, DriveResult, ListPage};
        use driveloom_embeddings::FakeEmbeddingProvider;
        use driveloom_extraction::{OcrPage, OcrProvider};
        use driveloom_postgres::PgClient;
        use jiff::Timestamp;

        use super::*;
        use crate::state::WorkerState;

        #[derive(Default)]
        struct RecordingDrive {
            export_calls: Mutex<Vec<(String, String)>>,
            download_calls: Mutex<Vec<String>>,
        }

        #[async_trait]
        impl DriveProvider for RecordingDrive {
            async fn list(&self, _folder_id: &str, _page_token: Option<&str>) -> DriveResult<ListPage> {
                Ok(ListPage::default())
            }

            async fn export_native(&self, file_id: &str, target_mime: &str) -> DriveResult<Vec<u8>> {
                self.export_calls.lock().unwrap().push((file_id.to_owned(), target_mime.to_owned()));
                Ok(b"# heading\n\nbody".to_vec())
            }

            async fn download(&self, file_id: &str) -> DriveResult<Vec<u8>> {
                self.download_calls.lock().unwrap().push(file_id.to_owned());
                Ok(b"raw bytes".to_vec())
            }
        }

        struct StubOcr;

        #[async_trait]
        impl OcrProvider for StubOcr {
            async fn ocr_document(
                &self,
                _bytes: &[u8],
                _mime_type: &str,
            ) -> driveloom_extraction::ExtractionResult<Vec<OcrPage>> {
                Ok(vec![])
            }
        }

        fn file(mime_type: &str) -> File {
            let now = Timestamp::now();
            File {
                id: Uuid::now_v7(),
                folder_id: Uuid::now_v7(),
                tenant_id: Uuid::now_v7(),
                remote_file_id: "remote-1".to_owned(),
                name: "doc".to_owned(),
                mime_type: mime_type.to_owned(),
                remote_modified_at: now,
                status: FileIndexStatus::Pending,
                preview: None,
                embedding: None,
                content_sha256: None,
                created_at: now,
                updated_at: now,
            }
        }

        fn state(drive: Arc<RecordingDrive>) -> WorkerState {
            let postgres = PgClient::new(driveloom_postgres::PgConfig::new("postgresql://localhost/db")).unwrap();
            WorkerState::new(postgres, drive, Arc::new(StubOcr), Arc::new(FakeEmbeddingProvider::default()))
        }

        #[tokio::test]
        async fn native_documents_are_exported_to_markdown() {
            let drive = Arc::new(RecordingDrive::default());
            let state = state(drive.clone());

            let (bytes, mime) = fetch_for_extraction(&state, &file("application/vnd.google-apps.document"))
                .await
                .unwrap();

            assert_eq!(mime, "text/markdown");
            assert_eq!(bytes, b"# heading\n\nbody");
            assert_eq!(drive.export_calls.lock().unwrap().len(), 1);
            assert!(drive.download_calls.lock().unwrap().is_empty());
        }

        #[tokio::test]
        async fn everything_else_is_downloaded_as_is() {
            let drive = Arc::new(RecordingDrive::default());
            let state = state(drive.clone());

            let (bytes, mime) = fetch_for_extraction(&state, &file("application/pdf")).await.unwrap();

            assert_eq!(mime, "application/pdf");
            assert_eq!(bytes, b"raw bytes");
            assert_eq!(drive.download_calls.lock().unwrap().len(), 1);
            assert!(drive.export_calls.lock().unwrap().is_empty());
        }
    }
}
