//! The top-level chat service (`spec.md` §4.H, §5), grounded on the
//! spawn-with-cancellation-token shape already used for indexing workers:
//! a chat turn runs on its own task, streaming [`ChatEvent`]s back over a
//! channel, with a [`CancellationToken`] the caller can trip to stop it.

use std::sync::Arc;

use driveloom_postgres::PgClient;
use driveloom_search::Retriever;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::agentic;
use crate::error::{ChatError, ChatResult};
use crate::event::ChatEvent;
use crate::generator::GeneratorProvider;
use crate::session::ConversationService;
use crate::standard;

/// The channel depth for a chat turn's event stream. Generous enough that
/// a slow consumer doesn't stall token production mid-turn.
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub folder_id: Uuid,
    pub tenant_id: Uuid,
    pub conversation_id: Option<Uuid>,
    pub message: String,
    /// Standard mode (one retrieval, one answer) when `false`; the
    /// tool-use loop when `true` (`spec.md` §4.H).
    pub agent_mode: bool,
    /// Overrides [`agentic::DEFAULT_MAX_ITERATIONS`], clamped to
    /// [`agentic::MAX_ITERATIONS_CEILING`]. Ignored in standard mode.
    pub max_iterations: Option<u32>,
}

/// A running chat turn: its event stream and the handle to cancel it.
pub struct ChatHandle {
    pub events: mpsc::Receiver<ChatEvent>,
    pub cancel: CancellationToken,
}

pub struct ChatService {
    postgres: PgClient,
    retriever: Arc<Retriever>,
    generator: Arc<dyn GeneratorProvider>,
    conversations: ConversationService,
}

impl ChatService {
    pub fn new(postgres: PgClient, retriever: Arc<Retriever>, generator: Arc<dyn GeneratorProvider>) -> Self {
        let conversations = ConversationService::new(postgres.clone());
        Self { postgres, retriever, generator, conversations }
    }

    /// Loads a conversation's history, scoped to its owning folder
    /// (`spec.md` §6 "Load conversation").
    pub async fn load_conversation(
        &self,
        conversation_id: Uuid,
        folder_id: Uuid,
    ) -> ChatResult<Vec<driveloom_core::types::Message>> {
        self.conversations.load(conversation_id, folder_id).await
    }

    /// Starts a chat turn. The returned stream is driven by a background
    /// task; dropping it or tripping the returned token stops the turn
    /// without committing a partial assistant message
    /// (`spec.md` §5 "cancelling it stops further tool iterations, aborts
    /// the in-flight generator stream, and commits no partial assistant
    /// message").
    pub async fn chat(&self, request: ChatRequest) -> ChatResult<ChatHandle> {
        let conversation = self.conversations.resolve(request.folder_id, request.conversation_id).await?;
        let history = self.conversations.history(conversation.id).await?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();

        let postgres = self.postgres.clone();
        let retriever = Arc::clone(&self.retriever);
        let generator = Arc::clone(&self.generator);
        let conversations = ConversationService::new(self.postgres.clone());
        let task_cancel = cancel.clone();

        tokio::spawn(async move {
            let outcome = if request.agent_mode {
                let max_iterations = agentic::clamp_iterations(request.max_iterations);
                agentic::run(
                    &conversation,
                    &request.message,
                    history,
                    &retriever,
                    generator.as_ref(),
                    &postgres,
                    request.tenant_id,
                    max_iterations,
                    &task_cancel,
                    &tx,
                )
                .await
            } else {
                standard::run(
                    &conversation,
                    &request.message,
                    history,
                    &retriever,
                    generator.as_ref(),
                    request.tenant_id,
                    &tx,
                )
                .await
            };

            let Some((answer, accumulator)) = outcome else {
                return;
            };
            if task_cancel.is_cancelled() {
                return;
            }

            let (citations, searched_files) = match accumulator.finalize(&postgres).await {
                Ok(result) => result,
                Err(err) => {
                    let _ = tx
                        .send(ChatEvent::Error { kind: "storage".to_owned(), message: err.safe_message() })
                        .await;
                    return;
                }
            };

            if let Err(err) =
                conversations.append_turn(conversation.id, &request.message, &answer, citations.clone()).await
            {
                let err: ChatError = err;
                let _ = tx.send(ChatEvent::Error { kind: "storage".to_owned(), message: err.safe_message() }).await;
                return;
            }

            let _ = tx.send(ChatEvent::Done { citations, searched_files, conversation_id: conversation.id }).await;
        });

        Ok(ChatHandle { events: rx, cancel })
    }
}
