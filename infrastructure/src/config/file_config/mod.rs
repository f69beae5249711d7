//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section is optional; missing keys fall back to defaults.

mod assistant;
mod llm;
mod logging;
mod tools;

pub use assistant::FileAssistantConfig;
pub use llm::FileLlmConfig;
pub use logging::FileLoggingConfig;
pub use tools::FileToolsConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted history scan depth
pub const MAX_HISTORY_SCAN_TURNS: usize = 20;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("assistant.history_window must be greater than 0")]
    EmptyHistoryWindow,

    #[error("assistant.history_scan_turns must be between 1 and {MAX_HISTORY_SCAN_TURNS}, got {0}")]
    InvalidHistoryScan(usize),

    #[error("assistant.tool_timeout_seconds cannot be 0")]
    InvalidToolTimeout,

    #[error("llm.timeout_seconds cannot be 0")]
    InvalidLlmTimeout,

    #[error("llm.model cannot be empty")]
    EmptyModelName,

    #[error("llm.base_url cannot be empty")]
    EmptyBaseUrl,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Language model endpoint
    pub llm: FileLlmConfig,
    /// Orchestration loop settings
    pub assistant: FileAssistantConfig,
    /// Data-provider settings
    pub tools: FileToolsConfig,
    /// Conversation log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration, returning every problem found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.assistant.history_window == 0 {
            errors.push(ConfigValidationError::EmptyHistoryWindow);
        }
        if !(1..=MAX_HISTORY_SCAN_TURNS).contains(&self.assistant.history_scan_turns) {
            errors.push(ConfigValidationError::InvalidHistoryScan(
                self.assistant.history_scan_turns,
            ));
        }
        if self.assistant.tool_timeout_seconds == 0 {
            errors.push(ConfigValidationError::InvalidToolTimeout);
        }
        if self.llm.timeout_seconds == 0 {
            errors.push(ConfigValidationError::InvalidLlmTimeout);
        }
        if self.llm.model.trim().is_empty() {
            errors.push(ConfigValidationError::EmptyModelName);
        }
        if self.llm.base_url.trim().is_empty() {
            errors.push(ConfigValidationError::EmptyBaseUrl);
        }

        errors
    }
}
