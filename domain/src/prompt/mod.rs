//! Prompt domain
//!
//! Assembly of the message list sent to the language model: system
//! instructions, history, tool-result notices and the user message.

mod template;

pub use template::PromptTemplate;
