//! The single active proposal and its vote set.

use super::rule::QuorumRule;
use crate::agent::value_objects::AgentId;
use serde::{Deserialize, Serialize};

/// A pending collective action awaiting a vote.
///
/// The proposer is recorded as the first voter. Votes are a set with
/// insertion order kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    text: String,
    proposer: AgentId,
    votes: Vec<AgentId>,
}

impl Proposal {
    pub fn open(text: impl Into<String>, proposer: AgentId) -> Self {
        Self {
            text: text.into(),
            votes: vec![proposer.clone()],
            proposer,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn proposer(&self) -> &AgentId {
        &self.proposer
    }

    pub fn votes(&self) -> &[AgentId] {
        &self.votes
    }

    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    pub fn has_voted(&self, agent: &AgentId) -> bool {
        self.votes.contains(agent)
    }

    /// Add a yes vote. Returns `false` if the agent had already voted.
    pub fn record_vote(&mut self, agent: AgentId) -> bool {
        if self.has_voted(&agent) {
            return false;
        }
        self.votes.push(agent);
        true
    }

    pub fn tally(&self, n_agents: usize, rule: QuorumRule) -> Tally {
        Tally {
            votes: self.vote_count(),
            n_agents,
            passed: rule.is_satisfied(self.vote_count(), n_agents),
        }
    }
}

/// Outcome of closing a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub votes: usize,
    pub n_agents: usize,
    pub passed: bool,
}

impl Tally {
    /// The count line broadcast to every agent when the vote closes
    pub fn count_line(&self) -> String {
        format!(
            "[VOTE] {}/{} agents have voted in favor of the proposal.\n",
            self.votes, self.n_agents
        )
    }

    pub fn verdict_line(&self) -> &'static str {
        if self.passed {
            "[VOTE] Vote has passed. Executing experiment generation script.\n\n"
        } else {
            "[VOTE] Vote has not passed.\n\n"
        }
    }
}
