//! Adapts the streaming chat generator port to the single-shot prompt
//! port `driveloom-embeddings::ContextAugmenter` depends on, so one
//! configured generator backs both the chat loop and chunk-context
//! augmentation instead of wiring two separate HTTP clients.

use async_trait::async_trait;
use driveloom_chat::{GenerationRequest, GeneratorEvent, GeneratorMessage, GeneratorProvider as ChatGeneratorProvider};
use driveloom_embeddings::{EmbeddingError, EmbeddingResult, ErrorKind};
use futures::StreamExt;
use std::sync::Arc;

pub struct AugmenterGenerator {
    chat_generator: Arc<dyn ChatGeneratorProvider>,
}

impl AugmenterGenerator {
    pub fn new(chat_generator: Arc<dyn ChatGeneratorProvider>) -> Self {
        Self { chat_generator }
    }
}

#[async_trait]
impl driveloom_embeddings::GeneratorProvider for AugmenterGenerator {
    async fn generate(&self, prompt: &str) -> EmbeddingResult<String> {
        let request = GenerationRequest {
            system_prompt: String::new(),
            messages: vec![GeneratorMessage::User { content: prompt.to_owned() }],
            tools: Vec::new(),
        };

        let mut stream = self
            .chat_generator
            .generate(request)
            .await
            .map_err(|err| EmbeddingError::new(ErrorKind::Internal).with_message(err.safe_message()))?;

        let mut text = String::new();
        while let Some(event) = stream.next().await {
            match event {
                Ok(GeneratorEvent::TextDelta { text: delta }) => text.push_str(&delta),
                Ok(GeneratorEvent::Stop { .. }) => break,
                Ok(GeneratorEvent::ToolUse { .. }) => {}
                Err(err) => return Err(EmbeddingError::new(ErrorKind::Internal).with_message(err.safe_message())),
            }
        }

        Ok(text)
    }
}
