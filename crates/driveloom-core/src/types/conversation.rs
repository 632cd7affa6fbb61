//! Conversation and Message entities (`spec.md` §3).

use std::collections::HashMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Citation;

/// A conversation scoped to one folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub folder_id: Uuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One append-only message within a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    /// Citation map, keyed by the `[N]` marker as a string (`spec.md` §6).
    /// Empty for user messages and for assistant messages with no sources.
    pub citations: HashMap<String, Citation>,
    pub created_at: Timestamp,
}

impl Message {
    pub fn user(conversation_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            conversation_id,
            role: MessageRole::User,
            content: content.into(),
            citations: HashMap::new(),
            created_at: Timestamp::now(),
        }
    }

    pub fn assistant(
        conversation_id: Uuid,
        content: impl Into<String>,
        citations: HashMap<String, Citation>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            conversation_id,
            role: MessageRole::Assistant,
            content: content.into(),
            citations,
            created_at: Timestamp::now(),
        }
    }
}
