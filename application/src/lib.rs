//! Application layer for agora
//!
//! This crate contains the turn engine, the session runner, port
//! definitions and engine configuration. It depends only on the domain
//! layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{EngineConfig, RetryPolicy};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    knowledge_graph::{GraphError, KnowledgeGraphPort, NoRebuildSignal, RebuildSignal, Traversal},
    llm_gateway::{Completion, CompletionRequest, GatewayError, LlmGateway, ResponseFormat},
    progress::{NoProgress, TurnProgressNotifier, TurnStage},
    script_runner::{ScriptError, ScriptRunner},
    session_store::{SessionStore, StoreError},
    work_queue::{QueueError, WorkQueue},
};
pub use use_cases::run_session::{
    RunSessionError, RunSessionInput, RunSessionUseCase, SessionReport, StopReason,
};
pub use use_cases::run_turn::{
    CommandOutcome, Notification, PlanOutcome, RunTurnError, TurnEngine, TurnPorts, TurnReport,
};
