//! Intent classification
//!
//! Two independent decisions are made per message:
//!
//! - [`category::classify_query`]: a coarse category used for telemetry and
//!   prompt flavour.
//! - [`detector::ToolDetector::detect`]: which tools must run, with their
//!   arguments resolved from the message (or recent human turns).
//!
//! [`follow_up`] recognises drafts in which the model announces it wants to
//! look something up.

pub mod category;
pub mod detector;
pub mod follow_up;
