//! Type definitions for the turn engine.

use crate::ports::knowledge_graph::{KnowledgeGraphPort, RebuildSignal};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::script_runner::ScriptRunner;
use crate::ports::work_queue::WorkQueue;
use agora_domain::{AgentId, DomainError, Tally, TurnCursor};
use std::sync::Arc;
use thiserror::Error;

/// Errors that end a turn without completing it.
///
/// Agent mistakes and external-call failures never show up here; they are
/// written to the agent's output and the turn goes on.
#[derive(Error, Debug)]
pub enum RunTurnError {
    #[error("Session state error: {0}")]
    State(#[from] DomainError),

    #[error("Session does not match the configured agents: {0}")]
    RosterMismatch(String),
}

/// External collaborators of the turn engine
#[derive(Clone)]
pub struct TurnPorts {
    pub gateway: Arc<dyn LlmGateway>,
    pub graph: Arc<dyn KnowledgeGraphPort>,
    pub rebuild: Arc<dyn RebuildSignal>,
    pub queue: Arc<dyn WorkQueue>,
    pub scripts: Arc<dyn ScriptRunner>,
}

/// Background signals observed at the start of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    GraphRebuilt,
    JobFinished,
}

/// What the Plan stage did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanOutcome {
    /// Planning is not configured for this agent
    #[default]
    Disabled,
    /// Counter incremented, not due yet
    Waiting,
    Updated,
    /// Planner asked to keep the old plan
    Incomplete,
    Failed,
}

/// One dispatched command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub name: String,
    pub accepted: bool,
}

/// Summary of one completed turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub agent: AgentId,
    pub cursor_before: TurnCursor,
    pub cursor_after: TurnCursor,
    pub notifications: Vec<Notification>,
    /// Model that answered the Reason call, if it succeeded
    pub model: Option<String>,
    pub reasoning_failed: bool,
    pub plan: PlanOutcome,
    /// Messages evicted by the Summarize stage
    pub evicted: usize,
    pub commands: Vec<CommandOutcome>,
    pub tally: Option<Tally>,
}

impl TurnReport {
    pub(super) fn new(agent: AgentId, cursor: TurnCursor) -> Self {
        Self {
            agent,
            cursor_before: cursor,
            cursor_after: cursor,
            notifications: Vec::new(),
            model: None,
            reasoning_failed: false,
            plan: PlanOutcome::default(),
            evicted: 0,
            commands: Vec::new(),
            tally: None,
        }
    }

    pub fn rejected_commands(&self) -> usize {
        self.commands.iter().filter(|c| !c.accepted).count()
    }

    /// Whether this turn completed a round
    pub fn completed_round(&self) -> bool {
        self.cursor_after.n_rounds > self.cursor_before.n_rounds
    }
}
