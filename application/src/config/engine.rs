//! Turn engine configuration.

use super::retry::RetryPolicy;
use agora_domain::{AgentRoster, QuorumRule};
use std::time::Duration;

/// Everything the turn engine needs besides its ports.
///
/// Built by the infrastructure config loader from the merged file and
/// environment configuration; the roster is already validated.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub roster: AgentRoster,
    /// Research objective woven into every agent's system prompt
    pub objective: String,
    pub quorum_rule: QuorumRule,
    pub retry: RetryPolicy,
    /// Upper bound for a single external call
    pub call_timeout: Duration,
    /// Seed for random node and example picks; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl EngineConfig {
    pub fn new(roster: AgentRoster) -> Self {
        Self {
            roster,
            objective: String::new(),
            quorum_rule: QuorumRule::default(),
            retry: RetryPolicy::default(),
            call_timeout: Duration::from_secs(60),
            seed: None,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_objective(mut self, objective: impl Into<String>) -> Self {
        self.objective = objective.into();
        self
    }

    pub fn with_quorum_rule(mut self, rule: QuorumRule) -> Self {
        self.quorum_rule = rule;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
