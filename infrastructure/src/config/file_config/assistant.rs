//! Orchestration settings (`[assistant]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tripwise_application::AssistantParams;

/// Raw assistant configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAssistantConfig {
    /// Conversation memory capacity in turns
    pub history_window: usize,
    /// Recent human turns scanned for missing tool arguments
    pub history_scan_turns: usize,
    /// Bound on draft-triggered follow-up iterations
    pub max_follow_up_iterations: usize,
    /// Deadline for each tool call
    pub tool_timeout_seconds: u64,
    /// Flight origin when the user names only a destination
    pub default_origin: String,
}

impl Default for FileAssistantConfig {
    fn default() -> Self {
        let params = AssistantParams::default();
        Self {
            history_window: params.history_window,
            history_scan_turns: params.history_scan_turns,
            max_follow_up_iterations: params.max_follow_up_iterations,
            tool_timeout_seconds: params.tool_timeout.as_secs(),
            default_origin: params.default_origin,
        }
    }
}

impl FileAssistantConfig {
    /// Convert to the application-layer parameters.
    pub fn to_params(&self) -> AssistantParams {
        AssistantParams::default()
            .with_history_window(self.history_window)
            .with_history_scan_turns(self.history_scan_turns)
            .with_max_follow_up_iterations(self.max_follow_up_iterations)
            .with_tool_timeout(Duration::from_secs(self.tool_timeout_seconds))
            .with_default_origin(self.default_origin.clone())
    }
}
