//! Domain layer for tripwise
//!
//! This crate contains the deterministic front-end that wraps the language
//! model: entity extraction, intent scoring, required-tool detection, answer
//! validation and the sliding-window conversation memory.
//! It has no dependencies on infrastructure or presentation concerns and
//! performs no I/O.
//!
//! # Core Concepts
//!
//! ## Extraction
//!
//! Ordered pattern cascades pull locations, currency pairs, amounts and city
//! pairs out of free text. Every extractor is a pure function returning
//! `Option`; `None` means "not determined", never an error.
//!
//! ## Intent
//!
//! - **Coarse category**: weighted keyword scoring (destination / packing /
//!   attractions / general)
//! - **Required tools**: per-tool keyword sets gated on successful extraction
//!
//! ## Validation
//!
//! Per-domain hallucination detectors (weather, flights, currency) and the
//! correction directive sent back to the model on a violation.

pub mod conversation;
pub mod core;
pub mod extraction;
pub mod intent;
pub mod orchestration;
pub mod prompt;
pub mod tool;
pub mod util;
pub mod validation;

// Re-export commonly used types
pub use conversation::{
    entities::{Message, Role, Turn},
    memory::{ConversationMemory, DEFAULT_HISTORY_WINDOW},
};
pub use core::error::DomainError;
pub use extraction::{
    CityPair, CurrencyPair, EntityKind, ExtractedEntity, SourceSpan, TripContext,
    analyze_trip_context, extract_amount, extract_city_pair, extract_country,
    extract_currency_pair, extract_location,
};
pub use intent::{
    category::{IntentScore, QueryCategory, classify_query},
    detector::{ToolDetector, ToolPlan},
    follow_up::has_follow_up_marker,
};
pub use orchestration::state::OrchestrationState;
pub use prompt::PromptTemplate;
pub use tool::{
    entities::{ToolCall, ToolDefinition, ToolName, ToolParameter, ToolSpec},
    provider::Tool,
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolInvocation, ToolResult},
};
pub use validation::{
    correction::correction_directive,
    rules::{ValidationDomain, ValidationRule},
    validator::{ResponseValidator, Violation},
};
