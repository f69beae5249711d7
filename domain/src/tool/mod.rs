//! Tool domain module
//!
//! This module defines the core abstractions for the assistant's **Tool
//! System**: the fixed catalog of travel data tools the orchestration loop can
//! schedule, the calls it builds for them, and the results they return.
//!
//! # Overview
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌────────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolInvocation │
//! │ (catalog)    │    │ (name+args)  │    │ (call+result)  │
//! └──────────────┘    └──────────────┘    └────────────────┘
//! ```
//!
//! The vocabulary is closed: [`ToolName`](entities::ToolName) enumerates every
//! tool in a fixed order, and that order is also the order in which detected
//! tools are scheduled.
//!
//! # Architecture
//!
//! - **Domain** (this module): definitions, the [`Tool`] trait, no I/O
//! - **Application** (`ToolExecutorPort`): port trait for execution
//! - **Infrastructure** (`ToolRegistry`): concrete data-provider tools plus
//!   failure capture

pub mod entities;
pub mod provider;
pub mod traits;
pub mod value_objects;

pub use entities::{ToolCall, ToolDefinition, ToolName, ToolSpec};
pub use provider::Tool;
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ToolError, ToolInvocation, ToolResult};
