//! File entity (`spec.md` §3 "File").

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-file indexing state (`spec.md` §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileIndexStatus {
    Pending,
    Indexing,
    Completed,
    Failed,
}

impl FileIndexStatus {
    /// A file in a terminal state no longer has an outstanding job.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// One file inside a folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct File {
    pub id: Uuid,
    pub folder_id: Uuid,
    /// Denormalized for defense-in-depth tenant filtering (`spec.md` §3, §6).
    pub tenant_id: Uuid,
    pub remote_file_id: String,
    pub name: String,
    pub mime_type: String,
    pub remote_modified_at: Timestamp,
    pub status: FileIndexStatus,
    /// Textual preview, capped at a few thousand characters.
    pub preview: Option<String>,
    /// File-level dense embedding (`"search_document: " + preview`).
    pub embedding: Option<Vec<f32>>,
    /// SHA-256 of the raw file bytes, used to short-circuit a
    /// `modified_time` bump that produced byte-identical content.
    pub content_sha256: Option<Vec<u8>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl File {
    /// Invariant from `spec.md` §3: a completed file must have a preview
    /// and a file-level embedding (lexical vector lives in storage only).
    pub fn completed_invariant_holds(&self) -> bool {
        if self.status != FileIndexStatus::Completed {
            return true;
        }
        self.preview.is_some() && self.embedding.is_some()
    }

    /// Returns the text to embed for the file-level embedding, per the
    /// `"search_document: "` document-mode prefix from `spec.md` §4.D/§4.F.
    pub fn document_embedding_input(&self) -> Option<String> {
        self.preview
            .as_ref()
            .map(|preview| format!("search_document: {preview}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> File {
        let now = Timestamp::now();
        File {
            id: Uuid::now_v7(),
            folder_id: Uuid::now_v7(),
            tenant_id: Uuid::now_v7(),
            remote_file_id: "f1".to_owned(),
            name: "plan.doc".to_owned(),
            mime_type: "application/msword".to_owned(),
            remote_modified_at: now,
            status: FileIndexStatus::Pending,
            preview: None,
            embedding: None,
            content_sha256: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn completed_requires_preview_and_embedding() {
        let mut file = base();
        file.status = FileIndexStatus::Completed;
        assert!(!file.completed_invariant_holds());

        file.preview = Some("hello".to_owned());
        file.embedding = Some(vec![0.0; 768]);
        assert!(file.completed_invariant_holds());
    }

    #[test]
    fn embedding_input_uses_document_prefix() {
        let mut file = base();
        file.preview = Some("quarterly results".to_owned());
        assert_eq!(
            file.document_embedding_input().as_deref(),
            Some("search_document: quarterly results")
        );
    }
}
