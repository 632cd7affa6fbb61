//! The outbound generator port (`spec.md` §6 "Generator service"): a
//! streaming message-create API with optional tool-use schemas. Mirrors
//! the `EmbeddingProvider`/`RerankProvider` HTTP-port shape already
//! established in this workspace; the generator's own wire contract is
//! out of scope (`spec.md` §1 Non-goals "the ... generation ... providers
//! themselves"), so [`HttpGeneratorProvider`] frames a plausible
//! streaming JSON contract rather than a specific vendor's API.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ChatError, ChatResult};
use crate::tool::ToolSchema;

pub const TRACING_TARGET: &str = "driveloom_chat::generator";

/// One message in the rolling history sent to the generator.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum GeneratorMessage {
    User { content: String },
    Assistant { content: String },
    /// A tool's result, keyed by the `tool_use_id` the model issued
    /// (`spec.md` §6 "tool-result messages keyed by the model's
    /// `tool_use_id`").
    ToolResult { tool_use_id: String, content: String },
}

/// One streaming generation request.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub messages: Vec<GeneratorMessage>,
    /// Empty in standard mode; populated with the tool catalog in
    /// agentic mode.
    pub tools: Vec<ToolSchema>,
}

/// Why the generator stopped producing a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
}

/// One event of a generator's streaming response.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneratorEvent {
    /// One token of assistant text.
    TextDelta { text: String },
    /// The model wants to invoke a tool.
    ToolUse { id: String, name: String, input: Value },
    /// Terminal event for this turn.
    Stop { stop_reason: StopReason },
}

pub type GeneratorStream = Pin<Box<dyn Stream<Item = ChatResult<GeneratorEvent>> + Send>>;

/// The generator-service port. One HTTP implementation backs it; callers
/// (standard and agentic mode) depend only on this trait.
#[async_trait]
pub trait GeneratorProvider: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> ChatResult<GeneratorStream>;
}

#[derive(Debug, Clone)]
pub struct HttpGeneratorConfig {
    pub base_url: url::Url,
    pub api_key: String,
    pub timeout: Duration,
}

impl HttpGeneratorConfig {
    pub fn new(base_url: url::Url, api_key: impl Into<String>) -> Self {
        // `spec.md` §5 "Timeouts": generator default is 60s per turn.
        Self { base_url, api_key: api_key.into(), timeout: Duration::from_secs(60) }
    }
}

#[derive(Serialize)]
struct GenerateRequestBody<'a> {
    system: &'a str,
    messages: &'a [GeneratorMessage],
    tools: &'a [ToolSchema],
    stream: bool,
}

/// HTTP client for a remote streaming generator.
pub struct HttpGeneratorProvider {
    http: reqwest::Client,
    config: HttpGeneratorConfig,
}

impl HttpGeneratorProvider {
    pub fn new(config: HttpGeneratorConfig) -> ChatResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ChatError::Generator(e.to_string()))?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl GeneratorProvider for HttpGeneratorProvider {
    async fn generate(&self, request: GenerationRequest) -> ChatResult<GeneratorStream> {
        let url = self
            .config
            .base_url
            .join("/v1/messages")
            .map_err(|e| ChatError::Generator(e.to_string()))?;

        let body = GenerateRequestBody {
            system: &request.system_prompt,
            messages: &request.messages,
            tools: &request.tools,
            stream: true,
        };

        let response = self
            .http
            .post(url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Generator(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            return Err(ChatError::Generator(format!("status {status}: {message}")));
        }

        Ok(Box::pin(parse_event_stream(response)))
    }
}

/// Splits a `data: <json>\n\n`-framed body into [`GeneratorEvent`]s
/// (`spec.md` §6 "Streaming framing"), buffering partial lines across
/// chunk boundaries.
fn parse_event_stream(response: reqwest::Response) -> impl Stream<Item = ChatResult<GeneratorEvent>> {
    async_stream::stream! {
        let mut buffer = String::new();
        let mut bytes = response.bytes_stream();

        while let Some(chunk) = bytes.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(err) => {
                    yield Err(ChatError::Generator(err.to_string()));
                    return;
                }
            };
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(pos) = buffer.find("\n\n") {
                let frame = buffer[..pos].to_owned();
                buffer.drain(..=pos + 1);

                for line in frame.lines() {
                    let Some(payload) = line.strip_prefix("data: ") else { continue };
                    match serde_json::from_str::<GeneratorEvent>(payload) {
                        Ok(event) => yield Ok(event),
                        Err(err) => {
                            tracing::warn!(target: TRACING_TARGET, error = %err, "dropping unparseable generator frame");
                        }
                    }
                }
            }
        }
    }
}
