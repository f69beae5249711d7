//! Tool domain value objects: immutable result and error types
//!
//! Every execution attempt produces exactly one [`ToolResult`]: either a
//! structured JSON payload or a failure reason. Errors raised by a tool are
//! never propagated past the executor; they are folded into
//! [`ToolResult::Failure`] and narrated to the model instead.

use super::entities::{ToolCall, ToolName};
use serde::{Deserialize, Serialize};

/// Error raised by a tool executor.
///
/// | Code | Description |
/// |------|-------------|
/// | `INVALID_ARGUMENT` | Missing or malformed arguments |
/// | `NOT_FOUND` | Upstream has no data for the requested entity |
/// | `UPSTREAM` | Data provider returned an error status |
/// | `EXECUTION_FAILED` | Transport or decoding failure |
/// | `TIMEOUT` | The caller-supplied deadline expired |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", format!("No data found for {}", resource.into()))
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new("UPSTREAM", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new(
            "TIMEOUT",
            format!("Operation timed out: {}", operation.into()),
        )
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Outcome of one tool execution attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolResult {
    Success { payload: serde_json::Value },
    Failure { reason: String },
}

impl ToolResult {
    pub fn success(payload: serde_json::Value) -> Self {
        ToolResult::Success { payload }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        ToolResult::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolResult::Success { .. })
    }

    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            ToolResult::Success { payload } => Some(payload),
            ToolResult::Failure { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            ToolResult::Success { .. } => None,
            ToolResult::Failure { reason } => Some(reason),
        }
    }
}

impl From<Result<serde_json::Value, ToolError>> for ToolResult {
    fn from(result: Result<serde_json::Value, ToolError>) -> Self {
        match result {
            Ok(payload) => ToolResult::success(payload),
            Err(error) => ToolResult::failure(error.to_string()),
        }
    }
}

/// One execution attempt of a tool within a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub call: ToolCall,
    pub result: ToolResult,
    pub duration_ms: u64,
}

impl ToolInvocation {
    pub fn new(call: ToolCall, result: ToolResult, duration_ms: u64) -> Self {
        Self {
            call,
            result,
            duration_ms,
        }
    }

    pub fn tool(&self) -> ToolName {
        self.call.tool
    }

    pub fn succeeded(&self) -> bool {
        self.result.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_error_display() {
        let err = ToolError::not_found("ZZZ").with_details("unsupported currency");
        assert_eq!(err.code, "NOT_FOUND");
        assert_eq!(
            err.to_string(),
            "[NOT_FOUND] No data found for ZZZ (unsupported currency)"
        );
    }

    #[test]
    fn test_result_from_error_becomes_failure() {
        let result: ToolResult = Err(ToolError::timeout("get_weather")).into();
        assert!(!result.is_success());
        assert!(result.failure_reason().unwrap().contains("TIMEOUT"));
        assert!(result.payload().is_none());
    }

    #[test]
    fn test_result_serializes_tagged() {
        let result = ToolResult::success(json!({"temperature": 12}));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["payload"]["temperature"], 12);
    }

    #[test]
    fn test_invocation_succeeded() {
        let call = ToolCall::new(ToolName::Weather).with_arg("location", "Berlin");
        let ok = ToolInvocation::new(call.clone(), ToolResult::success(json!({})), 4);
        let failed = ToolInvocation::new(call, ToolResult::failure("boom"), 4);
        assert!(ok.succeeded());
        assert!(!failed.succeeded());
        assert_eq!(ok.tool(), ToolName::Weather);
    }
}
