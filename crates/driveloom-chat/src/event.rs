//! The caller-facing event stream (`spec.md` §6 "Streaming framing"),
//! narrowed to this domain: no document-editing variants survive, since
//! editing is out of scope here.

use std::collections::HashMap;

use driveloom_core::types::Citation;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current phase of an in-flight agentic turn (`spec.md` §4.H "status
/// events naming the current phase").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentPhase {
    Searching,
    Rewriting,
    ReadingFile,
    Processing,
    Generating,
}

/// A progress update emitted while the agent loop iterates tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStatus {
    pub phase: AgentPhase,
    pub iteration: u32,
    pub tool: Option<String>,
}

/// One event of a chat response stream. The outer transport frames each
/// variant as `data: <json>\n\n` per `spec.md` §6; this type only
/// carries the payload, not the line framing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatEvent {
    /// One token of the assistant's answer.
    Token { text: String },
    /// Progress while the agent loop is iterating tools.
    Status { agent_status: AgentStatus },
    /// Terminal success event.
    Done {
        citations: HashMap<String, Citation>,
        searched_files: Vec<String>,
        conversation_id: Uuid,
    },
    /// Terminal failure event. No assistant message is persisted when
    /// this is emitted (`spec.md` §7 "never a partial message committed
    /// to history").
    Error { kind: String, message: String },
}
