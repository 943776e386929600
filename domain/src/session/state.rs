//! The authoritative session record.

use crate::agent::value_objects::AgentId;
use crate::command::QueuedCommand;
use crate::core::error::DomainError;
use crate::memory::MemoryMessage;
use crate::quorum::Proposal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet, VecDeque};

/// First message every agent sees
pub const INITIAL_MESSAGE: &str =
    "[SYSTEM] Your recommended first command is to send a greeting to your fellow agents.";

/// Round-robin position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnCursor {
    /// Index into the agent order
    pub turn: usize,
    /// Completed full cycles through the agent order
    pub n_rounds: u64,
}

impl TurnCursor {
    /// The cursor after one more turn; wrapping past the last agent
    /// completes a round.
    pub fn advance(self, n_agents: usize) -> Self {
        let turn = self.turn + 1;
        if turn >= n_agents {
            Self {
                turn: 0,
                n_rounds: self.n_rounds + 1,
            }
        } else {
            Self { turn, ..self }
        }
    }
}

/// Everything the session keeps for one agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub system_prompt: String,
    /// Running digest of evicted memory
    pub summary: String,
    pub plan: String,
    /// Turns since the plan was last replaced
    pub plan_counter: u32,
    pub memory: Vec<MemoryMessage>,
}

/// Session state owned by the turn engine.
///
/// Fields are private; the only way to change a state is
/// [`SessionState::apply`] with a [`SessionDelta`](super::SessionDelta),
/// which returns a new state and leaves this one untouched on error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub(super) agent_order: Vec<AgentId>,
    pub(super) agents: BTreeMap<AgentId, AgentRecord>,
    pub(super) command_queue: VecDeque<QueuedCommand>,
    pub(super) proposal: Option<Proposal>,
    pub(super) job_running: bool,
    pub(super) cursor: TurnCursor,
}

impl SessionState {
    /// Fresh session: every agent starts with the greeting message, an
    /// empty plan and summary, and the system prompt produced by
    /// `system_prompt`.
    pub fn new(
        agent_order: Vec<AgentId>,
        mut system_prompt: impl FnMut(&AgentId) -> String,
    ) -> Result<Self, DomainError> {
        check_order(&agent_order)?;

        let agents = agent_order
            .iter()
            .map(|id| {
                let record = AgentRecord {
                    system_prompt: system_prompt(id),
                    memory: vec![MemoryMessage::user(INITIAL_MESSAGE)],
                    ..AgentRecord::default()
                };
                (id.clone(), record)
            })
            .collect();

        Ok(Self {
            agent_order,
            agents,
            command_queue: VecDeque::new(),
            proposal: None,
            job_running: false,
            cursor: TurnCursor::default(),
        })
    }

    /// Check the structural invariants of a state that did not come from
    /// [`SessionState::new`], e.g. one read back from disk.
    pub fn validate(&self) -> Result<(), DomainError> {
        check_order(&self.agent_order)?;

        if self.agents.len() != self.agent_order.len() {
            return Err(DomainError::InvalidConfig(
                "agent records do not match the agent order".to_string(),
            ));
        }
        for id in &self.agent_order {
            let record = self
                .agents
                .get(id)
                .ok_or_else(|| DomainError::UnknownAgent(id.to_string()))?;
            if record.memory.is_empty() {
                return Err(DomainError::EmptyMemory(id.to_string()));
            }
        }

        if self.cursor.turn >= self.agent_order.len() {
            return Err(DomainError::CursorOutOfRange {
                turn: self.cursor.turn,
                n_agents: self.agent_order.len(),
            });
        }

        if let Some(proposal) = &self.proposal {
            for voter in proposal.votes() {
                if !self.agents.contains_key(voter) {
                    return Err(DomainError::UnknownAgent(voter.to_string()));
                }
            }
        }

        Ok(())
    }

    pub fn agent_order(&self) -> &[AgentId] {
        &self.agent_order
    }

    pub fn n_agents(&self) -> usize {
        self.agent_order.len()
    }

    pub fn cursor(&self) -> TurnCursor {
        self.cursor
    }

    /// The agent whose turn it is
    pub fn acting_agent(&self) -> &AgentId {
        &self.agent_order[self.cursor.turn]
    }

    /// The agent that acts after the current one
    pub fn next_agent(&self) -> &AgentId {
        &self.agent_order[self.cursor.advance(self.n_agents()).turn]
    }

    pub fn agent(&self, id: &AgentId) -> Option<&AgentRecord> {
        self.agents.get(id)
    }

    pub fn memory(&self, id: &AgentId) -> &[MemoryMessage] {
        self.agents
            .get(id)
            .map(|record| record.memory.as_slice())
            .unwrap_or_default()
    }

    pub fn command_queue(&self) -> &VecDeque<QueuedCommand> {
        &self.command_queue
    }

    pub fn proposal(&self) -> Option<&Proposal> {
        self.proposal.as_ref()
    }

    pub fn job_running(&self) -> bool {
        self.job_running
    }
}

fn check_order(agent_order: &[AgentId]) -> Result<(), DomainError> {
    if agent_order.is_empty() {
        return Err(DomainError::NoAgents);
    }
    let mut seen = HashSet::new();
    for id in agent_order {
        if id.is_blank() {
            return Err(DomainError::EmptyAgentId);
        }
        if !seen.insert(id) {
            return Err(DomainError::DuplicateAgent(id.to_string()));
        }
    }
    Ok(())
}
