//! Quorum rules for deciding a tally
//!
//! The threshold is always measured against the number of agents in the
//! session, not the number of votes cast: an agent that never votes counts
//! as a "no".

use serde::{Deserialize, Serialize};

/// Rule for determining whether a proposal passes
///
/// # Example
///
/// ```
/// use agora_domain::quorum::QuorumRule;
///
/// let rule = QuorumRule::Majority;
/// assert!(rule.is_satisfied(3, 4));  // 3 > 4/2
/// assert!(!rule.is_satisfied(2, 4)); // exactly half does not pass
///
/// let strict = QuorumRule::Unanimous;
/// assert!(strict.is_satisfied(3, 3));
/// assert!(!strict.is_satisfied(2, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuorumRule {
    /// Strictly more than `n_agents / 2` (integer floor) must vote yes
    #[default]
    Majority,

    /// Every agent must vote yes
    Unanimous,

    /// At least n agents must vote yes
    AtLeast(usize),
}

impl QuorumRule {
    /// Check if the rule is satisfied given yes votes and the agent count
    pub fn is_satisfied(&self, approvals: usize, n_agents: usize) -> bool {
        if n_agents == 0 {
            return false;
        }

        match self {
            QuorumRule::Majority => approvals > n_agents / 2,
            QuorumRule::Unanimous => approvals >= n_agents,
            QuorumRule::AtLeast(n) => approvals >= *n,
        }
    }

    /// Get a human-readable description of this rule
    pub fn description(&self) -> String {
        match self {
            QuorumRule::Majority => "majority (more than half)".to_string(),
            QuorumRule::Unanimous => "unanimous (all must approve)".to_string(),
            QuorumRule::AtLeast(n) => format!("at least {} approvals", n),
        }
    }
}

impl std::fmt::Display for QuorumRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for QuorumRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "majority" => Ok(QuorumRule::Majority),
            "unanimous" => Ok(QuorumRule::Unanimous),
            s if s.starts_with("atleast:") || s.starts_with("at_least:") => {
                let n: usize = s
                    .split(':')
                    .nth(1)
                    .ok_or("Missing number after atleast:")?
                    .parse()
                    .map_err(|_| "Invalid number for atleast")?;
                if n == 0 {
                    return Err("atleast:N requires N >= 1".to_string());
                }
                Ok(QuorumRule::AtLeast(n))
            }
            _ => Err(format!(
                "Unknown quorum rule: {}. Valid: majority, unanimous, atleast:N",
                s
            )),
        }
    }
}
