//! Session transcript logging.
//!
//! [`JsonlConversationLogger`] implements the
//! [`ConversationLogger`](agora_application::ConversationLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
