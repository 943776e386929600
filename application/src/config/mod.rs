//! Application-level configuration.
//!
//! - [`EngineConfig`]: roster, objective, quorum rule and call limits
//! - [`RetryPolicy`]: bounded retry around reasoning and graph calls

pub mod engine;
pub mod retry;

pub use engine::EngineConfig;
pub use retry::RetryPolicy;
