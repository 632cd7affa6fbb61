//! Result types for a retrieval (`SPEC_FULL.md` §4.G output).

use driveloom_core::types::Location;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inline excerpts are capped to keep context blocks and citation
/// records bounded (`spec.md` §6 "excerpt: string // ≤ 300 chars").
pub const MAX_EXCERPT_CHARS: usize = 300;

/// One chunk returned from a retrieval, already carrying what a caller
/// needs to display it or cite it, without a second round trip to
/// storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk_id: Uuid,
    pub file_id: Uuid,
    pub file_name: String,
    pub location: Location,
    pub excerpt: String,
    pub score: f64,
}

/// Truncates `text` to at most `MAX_EXCERPT_CHARS` characters, appending
/// an ellipsis marker when truncation occurs.
pub fn excerpt(text: &str) -> String {
    if text.chars().count() <= MAX_EXCERPT_CHARS {
        return text.to_owned();
    }
    let mut truncated: String = text.chars().take(MAX_EXCERPT_CHARS).collect();
    truncated.push('\u{2026}');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_unchanged() {
        assert_eq!(excerpt("hello"), "hello");
    }

    #[test]
    fn long_text_is_truncated_with_marker() {
        let text = "a".repeat(400);
        let result = excerpt(&text);
        assert_eq!(result.chars().count(), MAX_EXCERPT_CHARS + 1);
        assert!(result.ends_with('\u{2026}'));
    }
}
