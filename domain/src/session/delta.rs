//! Staged state changes and the reducer that applies them.
//!
//! A turn stage never mutates [`SessionState`] directly. It records what it
//! wants to change in a [`SessionDelta`] and the engine commits that delta
//! in one step. [`SessionState::apply`] works on a copy, so a delta that
//! does not fit the state is rejected without touching the committed state.

use super::state::{SessionState, TurnCursor};
use crate::agent::value_objects::AgentId;
use crate::command::QueuedCommand;
use crate::core::error::DomainError;
use crate::memory::{MemoryMessage, OutputBuffer, Role};
use crate::quorum::Proposal;
use std::collections::VecDeque;

/// A change to one agent's memory
#[derive(Debug, Clone, PartialEq)]
pub enum MemoryOp {
    /// Append to a buffer of the agent's last message
    Append {
        agent: AgentId,
        buffer: OutputBuffer,
        text: String,
    },
    /// Push a new empty message
    Push { agent: AgentId, role: Role },
    /// Drop the oldest `count` messages
    Evict { agent: AgentId, count: usize },
}

/// A change to one agent's text state
#[derive(Debug, Clone, PartialEq)]
pub enum AgentUpdate {
    SystemPrompt(String),
    Summary(String),
    Plan(String),
    PlanCounter(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProposalChange {
    Open(Proposal),
    AddVote(AgentId),
    Close,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueueChange {
    Replace(Vec<QueuedCommand>),
    PopFront,
}

/// Changes collected by one stage, applied in the order they were recorded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionDelta {
    memory: Vec<MemoryOp>,
    agents: Vec<(AgentId, AgentUpdate)>,
    queue: Vec<QueueChange>,
    proposal: Vec<ProposalChange>,
    job_running: Option<bool>,
    cursor: Option<TurnCursor>,
}

impl SessionDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn memory_ops(&self) -> &[MemoryOp] {
        &self.memory
    }

    fn append(&mut self, agent: &AgentId, buffer: OutputBuffer, text: impl Into<String>) -> &mut Self {
        self.memory.push(MemoryOp::Append {
            agent: agent.clone(),
            buffer,
            text: text.into(),
        });
        self
    }

    /// Append to the agent's own personal output
    pub fn personal_output(&mut self, agent: &AgentId, text: impl Into<String>) -> &mut Self {
        self.append(agent, OutputBuffer::Personal, text)
    }

    pub fn global_output(&mut self, agent: &AgentId, text: impl Into<String>) -> &mut Self {
        self.append(agent, OutputBuffer::Global, text)
    }

    pub fn model_output(&mut self, agent: &AgentId, text: impl Into<String>) -> &mut Self {
        self.append(agent, OutputBuffer::ModelOutput, text)
    }

    /// Append `text` to the global output of every agent in `order`,
    /// skipping `source` unless `include_source` is set.
    pub fn fan_out_global(
        &mut self,
        order: &[AgentId],
        source: &AgentId,
        text: &str,
        include_source: bool,
    ) -> &mut Self {
        for agent in order {
            if include_source || agent != source {
                self.global_output(agent, text);
            }
        }
        self
    }

    pub fn push_message(&mut self, agent: &AgentId, role: Role) -> &mut Self {
        self.memory.push(MemoryOp::Push {
            agent: agent.clone(),
            role,
        });
        self
    }

    pub fn evict(&mut self, agent: &AgentId, count: usize) -> &mut Self {
        self.memory.push(MemoryOp::Evict {
            agent: agent.clone(),
            count,
        });
        self
    }

    pub fn set_system_prompt(&mut self, agent: &AgentId, text: impl Into<String>) -> &mut Self {
        self.agents
            .push((agent.clone(), AgentUpdate::SystemPrompt(text.into())));
        self
    }

    pub fn set_summary(&mut self, agent: &AgentId, text: impl Into<String>) -> &mut Self {
        self.agents
            .push((agent.clone(), AgentUpdate::Summary(text.into())));
        self
    }

    pub fn set_plan(&mut self, agent: &AgentId, text: impl Into<String>) -> &mut Self {
        self.agents.push((agent.clone(), AgentUpdate::Plan(text.into())));
        self
    }

    pub fn set_plan_counter(&mut self, agent: &AgentId, counter: u32) -> &mut Self {
        self.agents
            .push((agent.clone(), AgentUpdate::PlanCounter(counter)));
        self
    }

    pub fn replace_queue(&mut self, commands: Vec<QueuedCommand>) -> &mut Self {
        self.queue.push(QueueChange::Replace(commands));
        self
    }

    pub fn pop_command(&mut self) -> &mut Self {
        self.queue.push(QueueChange::PopFront);
        self
    }

    pub fn open_proposal(&mut self, proposal: Proposal) -> &mut Self {
        self.proposal.push(ProposalChange::Open(proposal));
        self
    }

    pub fn add_vote(&mut self, agent: &AgentId) -> &mut Self {
        self.proposal.push(ProposalChange::AddVote(agent.clone()));
        self
    }

    pub fn close_proposal(&mut self) -> &mut Self {
        self.proposal.push(ProposalChange::Close);
        self
    }

    pub fn set_job_running(&mut self, running: bool) -> &mut Self {
        self.job_running = Some(running);
        self
    }

    pub fn set_cursor(&mut self, cursor: TurnCursor) -> &mut Self {
        self.cursor = Some(cursor);
        self
    }

    /// Append another delta's changes after this one's
    pub fn extend(&mut self, other: SessionDelta) -> &mut Self {
        self.memory.extend(other.memory);
        self.agents.extend(other.agents);
        self.queue.extend(other.queue);
        self.proposal.extend(other.proposal);
        if other.job_running.is_some() {
            self.job_running = other.job_running;
        }
        if other.cursor.is_some() {
            self.cursor = other.cursor;
        }
        self
    }
}

impl SessionState {
    /// Apply a delta, producing the next state.
    ///
    /// Memory operations run in recorded order, so an append recorded
    /// after a push lands in the pushed message.
    pub fn apply(&self, delta: &SessionDelta) -> Result<SessionState, DomainError> {
        let mut next = self.clone();

        for op in &delta.memory {
            next.apply_memory_op(op)?;
        }

        for (agent, update) in &delta.agents {
            let record = next
                .agents
                .get_mut(agent)
                .ok_or_else(|| DomainError::UnknownAgent(agent.to_string()))?;
            match update {
                AgentUpdate::SystemPrompt(text) => record.system_prompt = text.clone(),
                AgentUpdate::Summary(text) => record.summary = text.clone(),
                AgentUpdate::Plan(text) => record.plan = text.clone(),
                AgentUpdate::PlanCounter(counter) => record.plan_counter = *counter,
            }
        }

        for change in &delta.queue {
            match change {
                QueueChange::Replace(commands) => {
                    next.command_queue = VecDeque::from(commands.clone());
                }
                QueueChange::PopFront => {
                    next.command_queue.pop_front();
                }
            }
        }

        for change in &delta.proposal {
            match change {
                ProposalChange::Open(proposal) => next.proposal = Some(proposal.clone()),
                ProposalChange::AddVote(agent) => {
                    let proposal = next
                        .proposal
                        .as_mut()
                        .ok_or(DomainError::NoActiveProposal)?;
                    proposal.record_vote(agent.clone());
                }
                ProposalChange::Close => next.proposal = None,
            }
        }

        if let Some(running) = delta.job_running {
            next.job_running = running;
        }

        if let Some(cursor) = delta.cursor {
            if cursor.turn >= next.n_agents() {
                return Err(DomainError::CursorOutOfRange {
                    turn: cursor.turn,
                    n_agents: next.n_agents(),
                });
            }
            next.cursor = cursor;
        }

        Ok(next)
    }

    fn apply_memory_op(&mut self, op: &MemoryOp) -> Result<(), DomainError> {
        let agent = match op {
            MemoryOp::Append { agent, .. } | MemoryOp::Push { agent, .. } | MemoryOp::Evict { agent, .. } => agent,
        };
        let memory = &mut self
            .agents
            .get_mut(agent)
            .ok_or_else(|| DomainError::UnknownAgent(agent.to_string()))?
            .memory;

        match op {
            MemoryOp::Append { buffer, text, .. } => {
                let last = memory
                    .last_mut()
                    .ok_or_else(|| DomainError::EmptyMemory(agent.to_string()))?;
                let role = last.role().as_str();
                let target = last
                    .buffer_mut(*buffer)
                    .ok_or_else(|| DomainError::BufferMismatch {
                        agent: agent.to_string(),
                        role,
                        buffer: buffer.as_str(),
                    })?;
                target.push_str(text);
            }
            MemoryOp::Push { role, .. } => memory.push(MemoryMessage::empty(*role)),
            MemoryOp::Evict { count, .. } => {
                let count = (*count).min(memory.len());
                memory.drain(..count);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a() -> AgentId {
        AgentId::new("A")
    }

    fn b() -> AgentId {
        AgentId::new("B")
    }

    fn state() -> SessionState {
        SessionState::new(vec![a(), b()], |_| "prompt".to_string()).unwrap()
    }

    #[test]
    fn test_append_targets_last_message() {
        let mut delta = SessionDelta::new();
        delta
            .global_output(&a(), "before")
            .push_message(&a(), Role::Assistant)
            .model_output(&a(), "out");

        let next = state().apply(&delta).unwrap();
        let memory = next.memory(&a());
        assert_eq!(memory.len(), 2);
        assert!(matches!(&memory[0], MemoryMessage::User { global_output, .. } if global_output == "before"));
        assert_eq!(
            memory[1],
            MemoryMessage::Assistant {
                model_output: "out".to_string()
            }
        );
    }

    #[test]
    fn test_fan_out_skips_source() {
        let mut delta = SessionDelta::new();
        delta.fan_out_global(&[a(), b()], &a(), "[A] hi\n\n", false);

        let next = state().apply(&delta).unwrap();
        assert!(matches!(&next.memory(&a())[0], MemoryMessage::User { global_output, .. } if global_output.is_empty()));
        assert!(matches!(&next.memory(&b())[0], MemoryMessage::User { global_output, .. } if global_output == "[A] hi\n\n"));
    }

    #[test]
    fn test_buffer_mismatch_leaves_state_untouched() {
        let original = state();
        let mut delta = SessionDelta::new();
        delta
            .personal_output(&b(), "ok")
            .push_message(&a(), Role::Assistant)
            .personal_output(&a(), "wrong buffer");

        let error = original.apply(&delta).unwrap_err();
        assert_eq!(
            error,
            DomainError::BufferMismatch {
                agent: "A".to_string(),
                role: "assistant",
                buffer: "personal_output",
            }
        );
        assert_eq!(original, state());
    }

    #[test]
    fn test_evict_drops_oldest() {
        let mut delta = SessionDelta::new();
        for _ in 0..2 {
            delta
                .push_message(&a(), Role::Assistant)
                .push_message(&a(), Role::User);
        }
        let grown = state().apply(&delta).unwrap();
        assert_eq!(grown.memory(&a()).len(), 5);

        let mut evict = SessionDelta::new();
        evict.evict(&a(), 3);
        let next = grown.apply(&evict).unwrap();
        assert_eq!(next.memory(&a()).len(), 2);
        assert_eq!(next.memory(&a()), &grown.memory(&a())[3..]);
    }

    #[test]
    fn test_proposal_lifecycle() {
        let mut delta = SessionDelta::new();
        delta.open_proposal(Proposal::open("code", a())).add_vote(&b());
        let next = state().apply(&delta).unwrap();
        assert_eq!(next.proposal().unwrap().vote_count(), 2);

        let mut close = SessionDelta::new();
        close.close_proposal().set_job_running(true);
        let closed = next.apply(&close).unwrap();
        assert!(closed.proposal().is_none());
        assert!(closed.job_running());
    }

    #[test]
    fn test_vote_without_proposal_is_rejected() {
        let mut delta = SessionDelta::new();
        delta.add_vote(&b());
        assert_eq!(state().apply(&delta), Err(DomainError::NoActiveProposal));
    }

    #[test]
    fn test_queue_replace_and_pop() {
        let mut delta = SessionDelta::new();
        delta
            .replace_queue(vec![
                QueuedCommand::new("vote", serde_json::json!({})),
                QueuedCommand::new("message", serde_json::json!({"content": "x"})),
            ])
            .pop_command();
        let next = state().apply(&delta).unwrap();
        assert_eq!(next.command_queue().len(), 1);
        assert_eq!(next.command_queue()[0].name, "message");
    }

    #[test]
    fn test_cursor_out_of_range_rejected() {
        let mut delta = SessionDelta::new();
        delta.set_cursor(TurnCursor { turn: 5, n_rounds: 0 });
        assert!(state().apply(&delta).is_err());
    }

    #[test]
    fn test_unknown_agent_rejected() {
        let mut delta = SessionDelta::new();
        delta.set_plan(&AgentId::new("Z"), "plan");
        assert_eq!(
            state().apply(&delta),
            Err(DomainError::UnknownAgent("Z".to_string()))
        );
    }
}
