//! Response validation
//!
//! After each synthesis the draft answer is checked against the tool
//! results of the run, one [`rules::ValidationDomain`] at a time. A
//! violation produces a correction directive that is sent back to the model
//! once; the orchestration layer enforces the one-retry-per-domain bound.

pub mod correction;
pub mod rules;
pub mod validator;
