//! Conversation/message persistence: an ordered message list with
//! builder-style session creation, backed by durable storage rather than
//! a TTL'd cache — `spec.md` §6 "Load conversation" requires conversations
//! to survive past any one request.

use driveloom_core::types::{Conversation, Message};
use driveloom_postgres::PgClient;
use driveloom_postgres::query::{ConversationRepository, MessageRepository};
use uuid::Uuid;

use crate::error::{ChatError, ChatResult};

/// Thin service over the conversation/message repositories.
pub struct ConversationService {
    postgres: PgClient,
}

impl ConversationService {
    pub fn new(postgres: PgClient) -> Self {
        Self { postgres }
    }

    /// Resolves the conversation for a chat request: reuses an existing
    /// one (scoped to the folder, so a cross-folder id is rejected the
    /// same way a cross-tenant one would be) or starts a new one.
    pub async fn resolve(&self, folder_id: Uuid, conversation_id: Option<Uuid>) -> ChatResult<Conversation> {
        let mut conn = self.postgres.get_connection().await.map_err(ChatError::Storage)?;

        match conversation_id {
            Some(id) => conn
                .find_conversation_scoped(id, folder_id)
                .await
                .map_err(ChatError::from_scoped_lookup),
            None => conn.create_conversation(folder_id).await.map_err(ChatError::Storage),
        }
    }

    /// Loads a conversation's full message history in chronological order
    /// (`spec.md` §5 "Conversation messages are appended in request
    /// order").
    pub async fn history(&self, conversation_id: Uuid) -> ChatResult<Vec<Message>> {
        let mut conn = self.postgres.get_connection().await.map_err(ChatError::Storage)?;
        conn.list_messages(conversation_id).await.map_err(ChatError::Storage)
    }

    /// Loads a conversation by id, scoped to its owning folder
    /// (`spec.md` §6 "Load conversation").
    pub async fn load(&self, conversation_id: Uuid, folder_id: Uuid) -> ChatResult<Vec<Message>> {
        let mut conn = self.postgres.get_connection().await.map_err(ChatError::Storage)?;
        conn.find_conversation_scoped(conversation_id, folder_id)
            .await
            .map_err(ChatError::from_scoped_lookup)?;
        conn.list_messages(conversation_id).await.map_err(ChatError::Storage)
    }

    pub async fn append(&self, message: &Message) -> ChatResult<Message> {
        let mut conn = self.postgres.get_connection().await.map_err(ChatError::Storage)?;
        conn.append_message(message).await.map_err(ChatError::Storage)
    }

    /// Appends the user turn and the finished assistant turn together,
    /// called only once a chat turn has succeeded end to end — a
    /// generator failure or cancellation never reaches this point, so no
    /// partial assistant message is ever persisted (`spec.md` §7).
    pub async fn append_turn(
        &self,
        conversation_id: Uuid,
        user_message: &str,
        answer: &str,
        citations: std::collections::HashMap<String, driveloom_core::types::Citation>,
    ) -> ChatResult<()> {
        self.append(&Message::user(conversation_id, user_message)).await?;
        self.append(&Message::assistant(conversation_id, answer, citations)).await?;
        Ok(())
    }
}
