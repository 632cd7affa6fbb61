//! Standard chat mode (`spec.md` §4.H): one retrieval, then a single
//! streamed generation turn.

use driveloom_core::types::{Conversation, Message};
use driveloom_search::{Retriever, SearchRequest};
use futures::StreamExt;
use tokio::sync::mpsc::Sender;
use uuid::Uuid;

use crate::citation::CitationAccumulator;
use crate::context::{format_context_block, standard_system_prompt};
use crate::event::ChatEvent;
use crate::generator::{GeneratorEvent, GeneratorMessage, GeneratorProvider, GenerationRequest};

const NO_RETRIEVAL_INSTRUCTION: &str =
    "Retrieval failed for this turn. Tell the user you couldn't access their documents \
and answer only from general conversational knowledge, with no citations.";

/// Runs standard mode to completion, yielding events through `sink`.
pub async fn run(
    conversation: &Conversation,
    user_message: &str,
    history: Vec<Message>,
    retriever: &Retriever,
    generator: &dyn GeneratorProvider,
    tenant_id: Uuid,
    sink: &Sender<ChatEvent>,
) -> Option<(String, CitationAccumulator)> {
    let request = SearchRequest::new(conversation.folder_id, tenant_id, user_message);
    let chunks = match retriever.search(&request).await {
        Ok(chunks) => chunks,
        Err(err) => {
            tracing::warn!(target: "driveloom_chat", error = %err, "standard mode retrieval failed, degrading");
            Vec::new()
        }
    };

    let mut accumulator = CitationAccumulator::new();
    accumulator.record_scored(&chunks);

    let mut system_prompt = standard_system_prompt();
    if chunks.is_empty() {
        system_prompt.push(' ');
        system_prompt.push_str(NO_RETRIEVAL_INSTRUCTION);
    } else {
        system_prompt.push_str("\n\nContext:\n");
        system_prompt.push_str(&format_context_block(&accumulator, &chunks));
    }

    let mut messages: Vec<GeneratorMessage> = history
        .iter()
        .map(|m| match m.role {
            driveloom_core::types::MessageRole::User => GeneratorMessage::User { content: m.content.clone() },
            driveloom_core::types::MessageRole::Assistant => {
                GeneratorMessage::Assistant { content: m.content.clone() }
            }
        })
        .collect();
    messages.push(GeneratorMessage::User { content: user_message.to_owned() });

    let request = GenerationRequest { system_prompt, messages, tools: Vec::new() };

    let mut stream = match generator.generate(request).await {
        Ok(stream) => stream,
        Err(err) => {
            let _ = sink
                .send(ChatEvent::Error { kind: "generator".to_owned(), message: err.safe_message() })
                .await;
            return None;
        }
    };

    let mut answer = String::new();
    while let Some(event) = stream.next().await {
        match event {
            Ok(GeneratorEvent::TextDelta { text }) => {
                answer.push_str(&text);
                if sink.send(ChatEvent::Token { text }).await.is_err() {
                    return None;
                }
            }
            Ok(GeneratorEvent::Stop { .. }) => break,
            Ok(GeneratorEvent::ToolUse { .. }) => {
                // Standard mode sends no tool schemas, so the generator
                // should never request one; ignore defensively.
            }
            Err(err) => {
                let _ = sink
                    .send(ChatEvent::Error { kind: "generator".to_owned(), message: err.safe_message() })
                    .await;
                return None;
            }
        }
    }

    Some((answer, accumulator))
}
