//! Infrastructure layer for agora
//!
//! Adapters for the ports defined in the application layer: configuration
//! loading, the reasoning gateway, the knowledge graph store, work queues,
//! the script runner, session persistence and the transcript logger.

pub mod config;
pub mod graph;
pub mod logging;
pub mod openrouter;
pub mod queue;
pub mod scripts;
pub mod session;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, FileAgentConfig, FileConfig};
pub use graph::{GraphReloader, JsonGraphStore};
pub use logging::JsonlConversationLogger;
pub use openrouter::OpenRouterGateway;
pub use queue::{InMemoryWorkQueue, SpoolQueue};
pub use scripts::{DisabledScriptRunner, ProcessScriptRunner};
pub use session::JsonSessionStore;
