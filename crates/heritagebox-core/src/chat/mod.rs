//! Conversation handling: one inbound chat turn end-to-end.

pub mod assembler;
pub mod prompt;

pub use assembler::ConversationAssembler;
