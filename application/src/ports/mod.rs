//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod conversation_logger;
pub mod knowledge_graph;
pub mod llm_gateway;
pub mod progress;
pub mod script_runner;
pub mod session_store;
pub mod work_queue;
