//! Agentic chat mode (`spec.md` §4.H): a bounded tool-use loop over
//! `search_folder`/`get_file_chunks`/`get_file`/`rewrite_query`.

use driveloom_core::types::{Conversation, Message};
use driveloom_postgres::PgClient;
use driveloom_postgres::query::{ChunkRepository, FileRepository};
use driveloom_search::{Retriever, SearchRequest};
use futures::StreamExt;
use tokio::sync::mpsc::Sender;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::citation::CitationAccumulator;
use crate::context::agentic_system_prompt;
use crate::error::ChatError;
use crate::event::{AgentPhase, AgentStatus, ChatEvent};
use crate::generator::{GeneratorEvent, GeneratorMessage, GeneratorProvider, GenerationRequest};
use crate::tool::{ChunkSummary, FileSummary, SEARCH_EXCERPT_CHARS, ToolCall, ToolOutput, truncate};

/// Default tool-calling turns before the loop forces a final answer
/// (`spec.md` §4.H "nominally 3, configurable up to 10").
pub const DEFAULT_MAX_ITERATIONS: u32 = 3;
pub const MAX_ITERATIONS_CEILING: u32 = 10;

pub fn clamp_iterations(requested: Option<u32>) -> u32 {
    requested.unwrap_or(DEFAULT_MAX_ITERATIONS).clamp(1, MAX_ITERATIONS_CEILING)
}

fn phase_for(tool: &str) -> AgentPhase {
    match tool {
        ToolCall::SEARCH_FOLDER => AgentPhase::Searching,
        ToolCall::REWRITE_QUERY => AgentPhase::Rewriting,
        ToolCall::GET_FILE_CHUNKS | ToolCall::GET_FILE => AgentPhase::ReadingFile,
        _ => AgentPhase::Processing,
    }
}

/// Runs the agentic loop to completion, yielding events through `sink`.
/// Returns `None` if the turn ended in error or was cancelled — in both
/// cases nothing should be persisted (`spec.md` §5, §7).
#[allow(clippy::too_many_arguments)]
pub async fn run(
    conversation: &Conversation,
    user_message: &str,
    history: Vec<Message>,
    retriever: &Retriever,
    generator: &dyn GeneratorProvider,
    postgres: &PgClient,
    tenant_id: Uuid,
    max_iterations: u32,
    cancellation: &CancellationToken,
    sink: &Sender<ChatEvent>,
) -> Option<(String, CitationAccumulator)> {
    let mut accumulator = CitationAccumulator::new();
    let system_prompt = agentic_system_prompt(max_iterations);

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

    let mut iteration = 0u32;
    loop {
        if cancellation.is_cancelled() {
            return None;
        }

        let force_final = iteration >= max_iterations;
        let tools = if force_final { Vec::new() } else { ToolCall::catalog() };

        if sink
            .send(ChatEvent::Status {
                agent_status: AgentStatus { phase: AgentPhase::Generating, iteration, tool: None },
            })
            .await
            .is_err()
        {
            return None;
        }

        let request = GenerationRequest { system_prompt: system_prompt.clone(), messages: messages.clone(), tools };

        let mut stream = match generator.generate(request).await {
            Ok(stream) => stream,
            Err(err) => {
                let _ = sink
                    .send(ChatEvent::Error { kind: "generator".to_owned(), message: err.safe_message() })
                    .await;
                return None;
            }
        };

        let mut pending_text = String::new();
        let mut pending_tool_calls: Vec<(String, String, serde_json::Value)> = Vec::new();
        let mut stop_reason = None;

        while let Some(event) = stream.next().await {
            if cancellation.is_cancelled() {
                return None;
            }
            match event {
                Ok(GeneratorEvent::TextDelta { text }) => pending_text.push_str(&text),
                Ok(GeneratorEvent::ToolUse { id, name, input }) => pending_tool_calls.push((id, name, input)),
                Ok(GeneratorEvent::Stop { stop_reason: reason }) => {
                    stop_reason = Some(reason);
                    break;
                }
                Err(err) => {
                    let _ = sink
                        .send(ChatEvent::Error { kind: "generator".to_owned(), message: err.safe_message() })
                        .await;
                    return None;
                }
            }
        }

        let Some(stop_reason) = stop_reason else {
            let _ = sink
                .send(ChatEvent::Error {
                    kind: "generator".to_owned(),
                    message: "generator stream ended without a stop event".to_owned(),
                })
                .await;
            return None;
        };

        if stop_reason != crate::generator::StopReason::ToolUse || force_final || pending_tool_calls.is_empty() {
            // Final turn: stream the buffered answer token-by-token.
            if !pending_text.is_empty() && sink.send(ChatEvent::Token { text: pending_text.clone() }).await.is_err() {
                return None;
            }
            return Some((pending_text, accumulator));
        }

        messages.push(GeneratorMessage::Assistant { content: pending_text });

        for (tool_use_id, name, input) in pending_tool_calls {
            if cancellation.is_cancelled() {
                return None;
            }

            let call = match ToolCall::parse(&name, &input) {
                Ok(call) => call,
                Err(ChatError::InvalidInput(message)) => {
                    messages.push(GeneratorMessage::ToolResult {
                        tool_use_id,
                        content: ToolOutput::Error { error: message }.to_content(),
                    });
                    continue;
                }
                Err(_) => {
                    messages.push(GeneratorMessage::ToolResult {
                        tool_use_id,
                        content: ToolOutput::access_denied().to_content(),
                    });
                    continue;
                }
            };

            if sink
                .send(ChatEvent::Status {
                    agent_status: AgentStatus {
                        phase: phase_for(call.name()),
                        iteration,
                        tool: Some(call.name().to_owned()),
                    },
                })
                .await
                .is_err()
            {
                return None;
            }

            let output =
                dispatch(&call, conversation.folder_id, tenant_id, retriever, generator, postgres, &mut accumulator)
                    .await;
            messages.push(GeneratorMessage::ToolResult { tool_use_id, content: output.to_content() });
        }

        iteration += 1;
    }
}

#[allow(clippy::too_many_arguments)]
async fn dispatch(
    call: &ToolCall,
    folder_id: Uuid,
    tenant_id: Uuid,
    retriever: &Retriever,
    generator: &dyn GeneratorProvider,
    postgres: &PgClient,
    accumulator: &mut CitationAccumulator,
) -> ToolOutput {
    match call {
        ToolCall::SearchFolder { query } => {
            let request = SearchRequest::new(folder_id, tenant_id, query.clone());
            match retriever.search(&request).await {
                Ok(chunks) => {
                    accumulator.record_scored(&chunks);
                    ToolOutput::Chunks(
                        chunks
                            .into_iter()
                            .map(|c| ChunkSummary {
                                marker: accumulator.marker_for(c.chunk_id).unwrap_or_default(),
                                chunk_id: c.chunk_id,
                                file_id: c.file_id,
                                file_name: c.file_name,
                                content: truncate(&c.excerpt, SEARCH_EXCERPT_CHARS),
                                location: c.location,
                                score: Some(c.score),
                            })
                            .collect(),
                    )
                }
                Err(err) => {
                    tracing::warn!(target: "driveloom_chat", error = %err, "search_folder tool call failed");
                    ToolOutput::Error { error: "retrieval is temporarily unavailable".to_owned() }
                }
            }
        }
        ToolCall::GetFileChunks { file_id } => {
            let Ok(mut conn) = postgres.get_connection().await else {
                return ToolOutput::Error { error: "a storage error occurred".to_owned() };
            };
            let file = match conn.find_file_scoped(*file_id, tenant_id).await {
                Ok(file) if file.folder_id == folder_id => file,
                Ok(_) => return ToolOutput::access_denied(),
                Err(_) => return ToolOutput::access_denied(),
            };
            let chunks = match conn.list_chunks_for_file(*file_id).await {
                Ok(chunks) => chunks,
                Err(_) => return ToolOutput::Error { error: "a storage error occurred".to_owned() },
            };
            accumulator.record_raw(&file.name, &chunks);
            ToolOutput::Chunks(
                chunks
                    .into_iter()
                    .map(|c| ChunkSummary {
                        marker: accumulator.marker_for(c.id).unwrap_or_default(),
                        chunk_id: c.id,
                        file_id: c.file_id,
                        file_name: file.name.clone(),
                        content: truncate(&c.text, SEARCH_EXCERPT_CHARS),
                        location: c.location,
                        score: None,
                    })
                    .collect(),
            )
        }
        ToolCall::GetFile { file_id } => {
            let Ok(mut conn) = postgres.get_connection().await else {
                return ToolOutput::Error { error: "a storage error occurred".to_owned() };
            };
            match conn.find_file_scoped(*file_id, tenant_id).await {
                Ok(file) if file.folder_id == folder_id => ToolOutput::File(FileSummary {
                    file_id: file.id,
                    file_name: file.name,
                    preview: file.preview,
                    mime_type: file.mime_type,
                }),
                Ok(_) => ToolOutput::access_denied(),
                Err(_) => ToolOutput::access_denied(),
            }
        }
        ToolCall::RewriteQuery { original_query, feedback } => rewrite_query(generator, original_query, feedback).await,
    }
}

/// Asks the generator to turn a query that returned poor results into a
/// more specific one, given the model's own account of what went wrong
/// (`spec.md` §8 scenario 4: `"money last quarter"` + `"off-topic"` should
/// land closer to `"Q4 revenue"`, not just the two strings concatenated).
async fn rewrite_query(generator: &dyn GeneratorProvider, original_query: &str, feedback: &str) -> ToolOutput {
    let system_prompt = "You rewrite search queries. Given an original search query and feedback \
explaining why its results were unsatisfactory, output only the improved \
query text on its own, with no preamble, quotes, or explanation."
        .to_owned();
    let messages = vec![GeneratorMessage::User {
        content: format!("Original query: {original_query}\nFeedback: {feedback}"),
    }];
    let request = GenerationRequest { system_prompt, messages, tools: Vec::new() };

    let mut stream = match generator.generate(request).await {
        Ok(stream) => stream,
        Err(err) => return ToolOutput::Error { error: err.safe_message() },
    };

    let mut rewritten = String::new();
    while let Some(event) = stream.next().await {
        match event {
            Ok(GeneratorEvent::TextDelta { text }) => rewritten.push_str(&text),
            Ok(GeneratorEvent::Stop { .. }) => break,
            Ok(GeneratorEvent::ToolUse { .. }) => {}
            Err(err) => return ToolOutput::Error { error: err.safe_message() },
        }
    }

    let rewritten = rewritten.trim();
    if rewritten.is_empty() {
        return ToolOutput::RewrittenQuery { query: original_query.to_owned() };
    }

    ToolOutput::RewrittenQuery { query: rewritten.to_owned() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_iteration_count_is_three() {
        assert_eq!(clamp_iterations(None), 3);
    }

    #[test]
    fn requested_iterations_clamp_to_ceiling() {
        assert_eq!(clamp_iterations(Some(50)), MAX_ITERATIONS_CEILING);
    }

    #[test]
    fn requested_iterations_clamp_to_at_least_one() {
        assert_eq!(clamp_iterations(Some(0)), 1);
    }

    #[test]
    fn phase_mapping_matches_tool_intent() {
        assert_eq!(phase_for(ToolCall::SEARCH_FOLDER), AgentPhase::Searching);
        assert_eq!(phase_for(ToolCall::REWRITE_QUERY), AgentPhase::Rewriting);
        assert_eq!(phase_for(ToolCall::GET_FILE_CHUNKS), AgentPhase::ReadingFile);
        assert_eq!(phase_for(ToolCall::GET_FILE), AgentPhase::ReadingFile);
    }
}
