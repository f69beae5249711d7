//! Progress notification port
//!
//! Defines the interface for reporting progress while a message is
//! processed.

use tripwise_domain::{OrchestrationState, ToolCall, ToolInvocation, ToolName, ValidationDomain};

/// Callback for progress updates during one orchestration run
///
/// Implementations live in the binary and can display progress in various
/// ways (spinner, plain log lines, nothing at all).
pub trait ProgressNotifier: Send + Sync {
    /// Called on every state transition
    fn on_state(&self, state: OrchestrationState);

    /// Called before a tool call is dispatched
    fn on_tool_start(&self, _call: &ToolCall) {}

    /// Called once a tool call has produced its invocation
    fn on_tool_complete(&self, _invocation: &ToolInvocation) {}

    /// Called when a draft is sent back for correction
    fn on_correction(&self, _domains: &[ValidationDomain]) {}

    /// Called when a draft's follow-up marker schedules new tools
    fn on_follow_up(&self, _iteration: usize, _tools: &[ToolName]) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_state(&self, _state: OrchestrationState) {}
}
