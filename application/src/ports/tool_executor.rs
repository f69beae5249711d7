//! Tool executor port
//!
//! Defines the interface the orchestration loop uses to run data-provider
//! tools. Implementations never return an error: every attempt yields a
//! [`ToolInvocation`] whose result is either a payload or a failure reason.

use async_trait::async_trait;
use tripwise_domain::{ToolCall, ToolInvocation, ToolName, ToolSpec};

/// Port for executing tools
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Catalog of registered tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Whether `name` is registered
    fn has_tool(&self, name: ToolName) -> bool {
        self.tool_spec().contains(name)
    }

    /// Execute one tool call. Failures are folded into the invocation.
    async fn execute(&self, call: &ToolCall) -> ToolInvocation;
}
