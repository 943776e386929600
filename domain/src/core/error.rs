//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These are structural violations: a session that cannot be constructed,
/// or a state delta that does not fit the state it is applied to. Agent
/// mistakes (bad commands, duplicate votes) are never reported through
/// this type; they surface as `[ERROR]` lines in the agent's own output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("No agents configured for the session")]
    NoAgents,

    #[error("Agent id must not be empty")]
    EmptyAgentId,

    #[error("Duplicate agent id: {0}")]
    DuplicateAgent(String),

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Memory of agent {0} is empty")]
    EmptyMemory(String),

    #[error("Cannot append to {buffer} of a {role} message (agent {agent})")]
    BufferMismatch {
        agent: String,
        role: &'static str,
        buffer: &'static str,
    },

    #[error("No proposal is active")]
    NoActiveProposal,

    #[error("Turn cursor {turn} is out of range for {n_agents} agents")]
    CursorOutOfRange { turn: usize, n_agents: usize },

    #[error("Invalid knowledge graph: {0}")]
    InvalidGraph(String),
}

impl DomainError {
    /// Whether this error was caused by configuration rather than runtime state
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DomainError::NoAgents
                | DomainError::EmptyAgentId
                | DomainError::DuplicateAgent(_)
                | DomainError::InvalidConfig(_)
        )
    }
}
