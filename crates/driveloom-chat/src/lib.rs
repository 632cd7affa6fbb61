#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod agentic;
mod citation;
mod context;
mod error;
mod event;
mod generator;
mod session;
mod standard;
mod service;
mod tool;

pub use agentic::{DEFAULT_MAX_ITERATIONS, MAX_ITERATIONS_CEILING, clamp_iterations};
pub use citation::CitationAccumulator;
pub use error::{ChatError, ChatResult};
pub use event::{AgentPhase, AgentStatus, ChatEvent};
pub use generator::{
    GenerationRequest, GeneratorEvent, GeneratorMessage, GeneratorProvider, GeneratorStream, HttpGeneratorConfig,
    HttpGeneratorProvider, StopReason,
};
pub use service::{ChatHandle, ChatRequest, ChatService};
pub use session::ConversationService;
pub use tool::{ChunkSummary, FileSummary, ToolCall, ToolOutput, ToolSchema};
