//! Tool abstraction
//!
//! A [`Tool`] pairs a static [`ToolDefinition`] with an executor that calls
//! out to a data provider. Concrete tools live in the infrastructure layer;
//! the registry there owns a fixed set of them.
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │                   ToolRegistry                    │
//! │ (lookup by ToolName, validation, failure capture) │
//! └───────────────────────────────────────────────────┘
//!     │        │         │        │        │
//!     ▼        ▼         ▼        ▼        ▼
//!  weather  country  currency  flights  hotels ...
//! ```

use async_trait::async_trait;

use super::entities::{ToolCall, ToolDefinition};
use super::value_objects::ToolError;

/// A callable data-provider tool.
///
/// Implementations return `Err` for any failure; the registry turns it into
/// a `ToolResult::Failure` so nothing a tool does can abort a run.
#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> &ToolDefinition;

    async fn execute(&self, call: &ToolCall) -> Result<serde_json::Value, ToolError>;
}
