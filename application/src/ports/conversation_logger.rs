//! Port for the machine-readable conversation log.
//!
//! [`ConversationLogger`] records what happened during each message run
//! (tool plans, tool results, drafts, violations, final answers) as
//! structured events. Diagnostic text goes through `tracing`; this port
//! keeps the transcript itself, typically one JSONL line per event.

use serde_json::Value;

/// Kinds of event emitted by the orchestration loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationEventKind {
    UserMessage,
    ToolsScheduled,
    ToolResult,
    LlmDraft,
    ValidationViolation,
    FollowUp,
    FinalAnswer,
    LlmFailure,
}

impl ConversationEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationEventKind::UserMessage => "user_message",
            ConversationEventKind::ToolsScheduled => "tools_scheduled",
            ConversationEventKind::ToolResult => "tool_result",
            ConversationEventKind::LlmDraft => "llm_draft",
            ConversationEventKind::ValidationViolation => "validation_violation",
            ConversationEventKind::FollowUp => "follow_up",
            ConversationEventKind::FinalAnswer => "final_answer",
            ConversationEventKind::LlmFailure => "llm_failure",
        }
    }
}

/// One conversation event with its JSON payload.
///
/// The timestamp is added by the logger when the event is written.
#[derive(Debug, Clone)]
pub struct ConversationEvent {
    pub kind: ConversationEventKind,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(kind: ConversationEventKind, payload: Value) -> Self {
        Self { kind, payload }
    }

    pub fn event_type(&self) -> &'static str {
        self.kind.as_str()
    }
}

/// Port for logging conversation events.
///
/// `log` is synchronous and infallible; implementations swallow write
/// errors so a broken log never interrupts a conversation.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Logger used when no conversation log is configured.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
