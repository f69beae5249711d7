//! Orchestration domain
//!
//! The state machine driven by the process-message use case. The loop
//! itself lives in the application layer; this module only names the states
//! and their legal transitions so progress reporting and logs share one
//! vocabulary.

pub mod state;
