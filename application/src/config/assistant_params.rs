//! Assistant parameters: orchestration loop control.
//!
//! [`AssistantParams`] groups the static knobs of
//! [`ProcessMessageUseCase`](crate::use_cases::process_message::ProcessMessageUseCase).
//! The infrastructure config file is converted into this struct.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tripwise_domain::DEFAULT_HISTORY_WINDOW;
use tripwise_domain::intent::detector::DEFAULT_HISTORY_SCAN_TURNS;

/// Default bound on follow-up iterations per message.
pub const DEFAULT_MAX_FOLLOW_UP_ITERATIONS: usize = 3;

/// Orchestration loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantParams {
    /// Conversation memory capacity in turns.
    pub history_window: usize,
    /// Recent human turns scanned for missing tool arguments.
    pub history_scan_turns: usize,
    /// Bound on draft-triggered follow-up iterations.
    pub max_follow_up_iterations: usize,
    /// Deadline for each tool call; expiry becomes a failed invocation.
    pub tool_timeout: Duration,
    /// Flight origin used when the user names only a destination.
    pub default_origin: String,
}

impl Default for AssistantParams {
    fn default() -> Self {
        Self {
            history_window: DEFAULT_HISTORY_WINDOW,
            history_scan_turns: DEFAULT_HISTORY_SCAN_TURNS,
            max_follow_up_iterations: DEFAULT_MAX_FOLLOW_UP_ITERATIONS,
            tool_timeout: Duration::from_secs(15),
            default_origin: "London".to_string(),
        }
    }
}

impl AssistantParams {
    // ==================== Builder Methods ====================

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn with_history_scan_turns(mut self, turns: usize) -> Self {
        self.history_scan_turns = turns;
        self
    }

    pub fn with_max_follow_up_iterations(mut self, max: usize) -> Self {
        self.max_follow_up_iterations = max;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn with_default_origin(mut self, origin: impl Into<String>) -> Self {
        self.default_origin = origin.into();
        self
    }
}
