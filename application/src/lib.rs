//! Application layer for tripwise
//!
//! This crate contains the orchestration use case, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::AssistantParams;
pub use ports::{
    conversation_logger::{
        ConversationEvent, ConversationEventKind, ConversationLogger, NoConversationLogger,
    },
    llm_gateway::{GatewayError, LlmGateway},
    progress::{NoProgress, ProgressNotifier},
    tool_executor::ToolExecutorPort,
};
pub use use_cases::process_message::{
    AssistantReply, DECLINE_MESSAGE, ProcessMessageUseCase, ProcessOutcome, RunContext,
};
