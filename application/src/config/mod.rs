//! Application-level configuration.
//!
//! - [`AssistantParams`]: orchestration loop control (memory window,
//!   history scan depth, follow-up bound, tool timeout, default origin)

pub mod assistant_params;

pub use assistant_params::{AssistantParams, DEFAULT_MAX_FOLLOW_UP_ITERATIONS};
