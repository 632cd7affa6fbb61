//! The agentic loop's tool surface, as a closed sum type rather than a
//! reflection-derived dictionary of tool definitions (`spec.md` §9
//! REDESIGN FLAGS "tool schemas as reflection-derived dictionaries").
//! Each variant knows its own name, JSON schema, and how to parse its
//! arguments — there is no dynamic registry to keep in sync.

use driveloom_core::types::Location;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::{ChatError, ChatResult};

/// Maximum length of a chunk excerpt returned by `search_folder`
/// (`spec.md` §4.H "truncated content ≤500 chars").
pub const SEARCH_EXCERPT_CHARS: usize = 500;

/// One invocation the generator asked for, already parsed and validated.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    SearchFolder { query: String },
    GetFileChunks { file_id: Uuid },
    GetFile { file_id: Uuid },
    RewriteQuery { original_query: String, feedback: String },
}

impl ToolCall {
    pub const SEARCH_FOLDER: &'static str = "search_folder";
    pub const GET_FILE_CHUNKS: &'static str = "get_file_chunks";
    pub const GET_FILE: &'static str = "get_file";
    pub const REWRITE_QUERY: &'static str = "rewrite_query";

    /// Parses a generator-issued tool call. File identifiers are parsed as
    /// opaque UUIDs here, before any database access
    /// (`spec.md` §4.H "Input validation").
    pub fn parse(name: &str, input: &Value) -> ChatResult<Self> {
        match name {
            Self::SEARCH_FOLDER => Ok(Self::SearchFolder { query: required_str(input, "query")? }),
            Self::GET_FILE_CHUNKS => Ok(Self::GetFileChunks { file_id: required_uuid(input, "file_id")? }),
            Self::GET_FILE => Ok(Self::GetFile { file_id: required_uuid(input, "file_id")? }),
            Self::REWRITE_QUERY => Ok(Self::RewriteQuery {
                original_query: required_str(input, "original_query")?,
                feedback: required_str(input, "feedback")?,
            }),
            other => Err(ChatError::InvalidInput(format!("unknown tool: {other}"))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SearchFolder { .. } => Self::SEARCH_FOLDER,
            Self::GetFileChunks { .. } => Self::GET_FILE_CHUNKS,
            Self::GetFile { .. } => Self::GET_FILE,
            Self::RewriteQuery { .. } => Self::REWRITE_QUERY,
        }
    }

    /// The JSON schemas exposed to the generator for every tool
    /// (`SPEC_FULL.md` §4.H "a `JsonSchema`-shaped description emitted
    /// via a small `schema()` method per variant").
    pub fn catalog() -> Vec<ToolSchema> {
        vec![
            ToolSchema {
                name: Self::SEARCH_FOLDER,
                description: "Search the folder's indexed documents for relevant passages.",
                parameters: json!({
                    "type": "object",
                    "properties": { "query": { "type": "string" } },
                    "required": ["query"],
                }),
            },
            ToolSchema {
                name: Self::GET_FILE_CHUNKS,
                description: "Fetch every chunk of a file, in order, to widen context within it.",
                parameters: json!({
                    "type": "object",
                    "properties": { "file_id": { "type": "string" } },
                    "required": ["file_id"],
                }),
            },
            ToolSchema {
                name: Self::GET_FILE,
                description: "Inspect a file's name, preview, and MIME type.",
                parameters: json!({
                    "type": "object",
                    "properties": { "file_id": { "type": "string" } },
                    "required": ["file_id"],
                }),
            },
            ToolSchema {
                name: Self::REWRITE_QUERY,
                description: "Reformulate a search query after a poor-quality result set.",
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "original_query": { "type": "string" },
                        "feedback": { "type": "string" },
                    },
                    "required": ["original_query", "feedback"],
                }),
            },
        ]
    }
}

/// One tool's schema as handed to [`crate::generator::GeneratorProvider`].
#[derive(Debug, Clone, Serialize)]
pub struct ToolSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

/// A chunk as surfaced by `search_folder`/`get_file_chunks`. `marker` is
/// the same `[N]` number the final answer must cite — the citation
/// contract in the system prompt only works if the tool result carries it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkSummary {
    pub marker: usize,
    pub chunk_id: Uuid,
    pub file_id: Uuid,
    pub file_name: String,
    pub content: String,
    pub location: Location,
    pub score: Option<f64>,
}

/// A file as surfaced by `get_file`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSummary {
    pub file_id: Uuid,
    pub file_name: String,
    pub preview: Option<String>,
    pub mime_type: String,
}

/// What a tool dispatch hands back to the model, serialized as the
/// tool-result message content. Authorization and validation failures are
/// represented here rather than as a [`ChatError`], since the loop must
/// keep running and let the model react
/// (`spec.md` §4.H "Authorization ... returns `{error: "access denied"}`").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Chunks(Vec<ChunkSummary>),
    File(FileSummary),
    RewrittenQuery { query: String },
    Error { error: String },
}

impl ToolOutput {
    pub fn access_denied() -> Self {
        Self::Error { error: "access denied".to_owned() }
    }

    /// Renders this output as the tool-result message content sent back
    /// to the generator.
    pub fn to_content(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{\"error\":\"serialization failed\"}".to_owned())
    }
}

/// Truncates `text` to at most `max_chars` characters.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    text.chars().take(max_chars).collect()
}

fn required_str(input: &Value, field: &str) -> ChatResult<String> {
    input
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ChatError::InvalidInput(format!("missing or empty field: {field}")))
}

fn required_uuid(input: &Value, field: &str) -> ChatResult<Uuid> {
    let raw = input
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| ChatError::InvalidInput(format!("missing field: {field}")))?;
    Uuid::parse_str(raw).map_err(|_| ChatError::InvalidInput(format!("malformed uuid in {field}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_folder() {
        let call = ToolCall::parse("search_folder", &json!({"query": "revenue"})).unwrap();
        assert_eq!(call, ToolCall::SearchFolder { query: "revenue".to_owned() });
    }

    #[test]
    fn rejects_malformed_file_id_before_lookup() {
        let err = ToolCall::parse("get_file", &json!({"file_id": "not-a-uuid"})).unwrap_err();
        assert!(matches!(err, ChatError::InvalidInput(_)));
    }

    #[test]
    fn rejects_unknown_tool_name() {
        let err = ToolCall::parse("delete_everything", &json!({})).unwrap_err();
        assert!(matches!(err, ChatError::InvalidInput(_)));
    }

    #[test]
    fn truncate_respects_char_boundary() {
        let text = "a".repeat(600);
        assert_eq!(truncate(&text, SEARCH_EXCERPT_CHARS).chars().count(), SEARCH_EXCERPT_CHARS);
    }
}
