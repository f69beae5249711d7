//! Infrastructure layer for tripwise
//!
//! Adapters for the ports defined in the application layer: the
//! OpenAI-compatible LLM gateway, the travel data tools and their registry,
//! configuration file loading and the JSONL conversation log.

pub mod config;
pub mod llm;
pub mod logging;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileAssistantConfig, FileConfig, FileLlmConfig,
    FileLoggingConfig, FileToolsConfig,
};
pub use llm::OpenAiCompatibleGateway;
pub use logging::JsonlConversationLogger;
pub use tools::{ProviderClient, ProviderError, ToolRegistry, build_registry, tool_catalog};
