//! Per-agent conversation memory.
//!
//! Each agent owns an ordered list of [`MemoryMessage`]s. An assistant
//! entry is opened at the start of the agent's turn and receives the raw
//! reasoning output; a user entry is opened right after and collects
//! personal command output plus broadcasts from other agents until the
//! agent acts again.

pub mod chat;
pub mod message;
pub mod render;

pub use chat::{ChatMessage, ChatRole};
pub use message::{MemoryMessage, OutputBuffer, Role};
pub use render::{interaction_text, reasoning_context, to_chat_message};
