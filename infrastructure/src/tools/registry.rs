//! Tool Registry
//!
//! The [`ToolRegistry`] owns the fixed set of data-provider tools and
//! implements [`ToolExecutorPort`]. Every call is looked up by
//! [`ToolName`], validated against its definition, and executed with panic
//! capture, so each attempt yields exactly one [`ToolInvocation`]:
//!
//! ```text
//! execute(call)
//!   ├─ unknown tool        → Failure [NOT_FOUND]
//!   ├─ invalid arguments   → Failure [INVALID_ARGUMENT]
//!   ├─ tool returns Err    → Failure [code from the tool]
//!   ├─ tool panics         → Failure [EXECUTION_FAILED]
//!   └─ tool returns Ok     → Success { payload }
//! ```

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::FutureExt;
use serde_json::Value;
use tripwise_application::ports::tool_executor::ToolExecutorPort;
use tripwise_domain::{
    DefaultToolValidator, Tool, ToolCall, ToolError, ToolInvocation, ToolName, ToolResult,
    ToolSpec, ToolValidator,
};

/// Registry of data-provider tools, keyed by name.
pub struct ToolRegistry {
    tools: BTreeMap<ToolName, Arc<dyn Tool>>,
    tool_spec: ToolSpec,
    validator: DefaultToolValidator,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
            tool_spec: ToolSpec::new(),
            validator: DefaultToolValidator,
        }
    }

    /// Register a tool; a later tool with the same name replaces the earlier one.
    pub fn register<T: Tool + 'static>(self, tool: T) -> Self {
        self.register_arc(Arc::new(tool))
    }

    /// Register a tool (Arc version)
    pub fn register_arc(mut self, tool: Arc<dyn Tool>) -> Self {
        let definition = tool.definition().clone();
        tracing::debug!(tool = %definition.name, "Registered tool");
        self.tool_spec = self.tool_spec.register(definition.clone());
        self.tools.insert(definition.name, tool);
        self
    }

    pub fn tool_names(&self) -> Vec<ToolName> {
        self.tools.keys().copied().collect()
    }

    async fn run(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let tool = self
            .tools
            .get(&call.tool)
            .ok_or_else(|| ToolError::not_found(format!("tool {}", call.tool)))?;

        self.validator
            .validate(call, tool.definition())
            .map_err(ToolError::invalid_argument)?;

        match AssertUnwindSafe(tool.execute(call)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                tracing::error!(tool = %call.tool, "Tool panicked");
                Err(ToolError::execution_failed(format!(
                    "{} stopped unexpectedly",
                    call.tool
                ))
                .with_details(panic_message(panic.as_ref())))
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolInvocation {
        let started = Instant::now();
        tracing::debug!(tool = %call.tool, args = %call.arguments_json(), "Executing tool");

        let result = self.run(call).await;
        if let Err(e) = &result {
            tracing::warn!(tool = %call.tool, error = %e, "Tool failed");
        }

        ToolInvocation::new(
            call.clone(),
            ToolResult::from(result),
            started.elapsed().as_millis() as u64,
        )
    }
}
