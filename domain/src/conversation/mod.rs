//! Conversation domain
//!
//! Turns exchanged with the user and the bounded memory that holds them.
//!
//! - [`entities::Turn`]: one completed utterance (human or assistant),
//!   immutable after creation
//! - [`entities::Message`]: a role-tagged prompt message sent to the model
//! - [`memory::ConversationMemory`]: sliding window of turns, oldest evicted
//!   first

pub mod entities;
pub mod memory;
