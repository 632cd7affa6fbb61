//! Citation record (`spec.md` §6).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Location;

/// Maximum length of a citation excerpt (`spec.md` §6).
pub const MAX_EXCERPT_LEN: usize = 300;

/// One resolved citation, keyed by its `[N]` marker in the assistant's text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub chunk_id: Uuid,
    pub file_id: Uuid,
    pub file_name: String,
    pub location: Location,
    pub excerpt: String,
    pub drive_deep_link: String,
}

impl Citation {
    /// Builds a citation, truncating the excerpt to the contract length.
    pub fn new(
        chunk_id: Uuid,
        file_id: Uuid,
        file_name: impl Into<String>,
        location: Location,
        excerpt: impl Into<String>,
        drive_deep_link: impl Into<String>,
    ) -> Self {
        let excerpt = truncate_excerpt(&excerpt.into());
        Self {
            chunk_id,
            file_id,
            file_name: file_name.into(),
            location,
            excerpt,
            drive_deep_link: drive_deep_link.into(),
        }
    }
}

fn truncate_excerpt(excerpt: &str) -> String {
    if excerpt.chars().count() <= MAX_EXCERPT_LEN {
        return excerpt.to_owned();
    }
    excerpt.chars().take(MAX_EXCERPT_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_is_truncated_to_contract_length() {
        let long = "x".repeat(1000);
        let citation = Citation::new(
            Uuid::now_v7(),
            Uuid::now_v7(),
            "report.pdf",
            Location::Pdf { page: 1, block_index: 0 },
            long,
            "https://drive.example/report.pdf#page=1",
        );
        assert_eq!(citation.excerpt.chars().count(), MAX_EXCERPT_LEN);
    }

    #[test]
    fn short_excerpt_is_unchanged() {
        let citation = Citation::new(
            Uuid::now_v7(),
            Uuid::now_v7(),
            "report.pdf",
            Location::Pdf { page: 1, block_index: 0 },
            "short",
            "https://drive.example/report.pdf#page=1",
        );
        assert_eq!(citation.excerpt, "short");
    }
}
