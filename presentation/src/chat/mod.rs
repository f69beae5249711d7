//! Interactive chat module
//!
//! Provides a line-editor based chat session that keeps conversation
//! memory across questions.

mod repl;

pub use repl::{ChatCommand, ChatRepl};
