//! OpenRouter-compatible chat-completions adapter
//!
//! Implements [`LlmGateway`](agora_application::LlmGateway) over any
//! endpoint that speaks the OpenAI chat-completions wire format and
//! accepts a `models` fallback list.

pub mod gateway;
pub mod protocol;

pub use gateway::OpenRouterGateway;
