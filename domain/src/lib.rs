//! Domain layer for agora
//!
//! Pure data and rules for a turn-based multi-agent session. Nothing here
//! performs I/O or depends on an async runtime.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! Agents act one at a time in a fixed round-robin order. All shared
//! state lives in [`SessionState`] and changes only through
//! [`SessionDelta`]s committed by the turn engine.
//!
//! ## Commands
//!
//! On its turn an agent issues a list of [`Command`]s: messages to the
//! other agents, proposals and votes, and knowledge graph queries.
//!
//! ## Quorum
//!
//! One proposal may be open at a time. It passes when strictly more than
//! half of all agents voted for it by the time the turn returns to the
//! proposer (see [`QuorumRule`]).

pub mod agent;
pub mod command;
pub mod core;
pub mod graph;
pub mod memory;
pub mod prompt;
pub mod quorum;
pub mod session;

// Re-export commonly used types
pub use agent::{
    profile::{AgentProfile, Eviction, MemoryPolicy},
    roster::AgentRoster,
    validation::{ConfigIssue, ConfigIssueCode, Severity},
    value_objects::AgentId,
};
pub use command::{Command, CommandError, QueuedCommand, StartNode, parse_command_queue};
pub use core::error::DomainError;
pub use graph::{GraphDocument, GraphNode, KnowledgeGraph, NodeId, TraversalAlgorithm};
pub use memory::{ChatMessage, ChatRole, MemoryMessage, OutputBuffer, Role};
pub use prompt::{AgentPromptTemplate, PLAN_INCOMPLETE};
pub use quorum::{Proposal, QuorumRule, Tally};
pub use session::{AgentRecord, SessionDelta, SessionState, TurnCursor};
