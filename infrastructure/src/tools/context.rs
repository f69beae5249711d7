//! analyze_trip_context: local extraction of budget, travellers, duration
//! and interests. Never leaves the process.

use async_trait::async_trait;
use serde_json::Value;
use tripwise_domain::{
    Tool, ToolCall, ToolDefinition, ToolError, ToolName, ToolParameter, analyze_trip_context,
};

pub fn definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::TripContext,
        "Structured trip context (budget, group, duration, interests) from the user's message.",
    )
    .with_parameter(ToolParameter::new("message", "The user's message", true))
}

pub struct TripContextTool {
    definition: ToolDefinition,
}

impl TripContextTool {
    pub fn new() -> Self {
        Self {
            definition: definition(),
        }
    }
}

impl Default for TripContextTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for TripContextTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let message = call
            .require_string("message")
            .map_err(ToolError::invalid_argument)?;
        serde_json::to_value(analyze_trip_context(message))
            .map_err(|e| ToolError::execution_failed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_context_payload_is_object() {
        let call = ToolCall::new(ToolName::TripContext)
            .with_arg("message", "cheap family holiday for a week");
        let payload = TripContextTool::new().execute(&call).await.unwrap();
        assert!(payload.is_object());
    }

    #[tokio::test]
    async fn test_missing_message() {
        let err = TripContextTool::new()
            .execute(&ToolCall::new(ToolName::TripContext))
            .await
            .unwrap_err();
        assert_eq!(err.code, "INVALID_ARGUMENT");
    }
}
