//! LLM Gateway port
//!
//! Defines the interface for the language model service. The model is
//! treated as stateless: every call carries the full message context.

use async_trait::async_trait;
use thiserror::Error;
use tripwise_domain::Message;

/// Errors that can occur when talking to the language model
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway to a chat-completion language model
///
/// Implementations live in the infrastructure layer (e.g. an
/// OpenAI-compatible HTTP client).
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Model identifier, used in logs
    fn model_name(&self) -> &str;

    /// Send an ordered list of role-tagged messages and return the
    /// completion text.
    async fn complete(&self, messages: &[Message]) -> Result<String, GatewayError>;
}
