//! Per-agent settings: models, planning cadence and memory bounds.

use super::value_objects::AgentId;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// How many of the oldest messages are folded into the summary when an
/// agent's memory grows past its cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eviction {
    /// Evict a fixed number of messages
    Count(usize),
    /// Evict this fraction of the current memory (rounded down)
    Fraction(f64),
}

impl Default for Eviction {
    fn default() -> Self {
        Eviction::Fraction(0.5)
    }
}

impl Eviction {
    /// Number of messages to evict from a memory of length `len`.
    ///
    /// Always at least one and never the trailing message, which is the
    /// open output slot of the current turn.
    pub fn messages_to_evict(&self, len: usize) -> usize {
        if len < 2 {
            return 0;
        }
        let raw = match self {
            Eviction::Count(n) => *n,
            Eviction::Fraction(f) => (len as f64 * f).floor() as usize,
        };
        raw.clamp(1, len - 1)
    }

    fn validate(&self, agent: &AgentId) -> Result<(), DomainError> {
        match self {
            Eviction::Count(0) => Err(DomainError::InvalidConfig(format!(
                "agent '{}': eviction count must be at least 1",
                agent
            ))),
            Eviction::Fraction(f) if !(*f > 0.0 && *f < 1.0) => Err(DomainError::InvalidConfig(
                format!(
                    "agent '{}': delete fraction must be between 0 and 1 (exclusive), got {}",
                    agent, f
                ),
            )),
            _ => Ok(()),
        }
    }
}

/// Bounded-size policy for an agent's conversation memory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryPolicy {
    /// Memory length above which the Summarize stage runs
    pub max_messages: usize,
    pub eviction: Eviction,
}

impl Default for MemoryPolicy {
    fn default() -> Self {
        Self {
            max_messages: 15,
            eviction: Eviction::default(),
        }
    }
}

impl MemoryPolicy {
    pub fn needs_summary(&self, len: usize) -> bool {
        len > self.max_messages
    }
}

/// Static description of one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: AgentId,
    /// Models tried in order by the reasoning gateway
    pub models: Vec<String>,
    /// Turns between replans; `None` disables the Plan stage
    pub plan_frequency: Option<u32>,
    pub memory: MemoryPolicy,
}

impl AgentProfile {
    pub fn new(id: impl Into<AgentId>) -> Self {
        Self {
            id: id.into(),
            models: Vec::new(),
            plan_frequency: None,
            memory: MemoryPolicy::default(),
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    pub fn with_plan_frequency(mut self, frequency: u32) -> Self {
        self.plan_frequency = Some(frequency);
        self
    }

    pub fn with_memory(mut self, memory: MemoryPolicy) -> Self {
        self.memory = memory;
        self
    }

    /// Whether a plan counter value has reached the replanning threshold
    pub fn plan_due(&self, counter: u32) -> bool {
        self.plan_frequency.is_some_and(|freq| counter >= freq)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.is_blank() {
            return Err(DomainError::EmptyAgentId);
        }
        if self.memory.max_messages < 2 {
            return Err(DomainError::InvalidConfig(format!(
                "agent '{}': max memory must be at least 2 messages",
                self.id
            )));
        }
        self.memory.eviction.validate(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_eviction() {
        let eviction = Eviction::Fraction(0.5);
        assert_eq!(eviction.messages_to_evict(16), 8);
        assert_eq!(eviction.messages_to_evict(3), 1);
    }

    #[test]
    fn test_eviction_keeps_trailing_message() {
        assert_eq!(Eviction::Count(10).messages_to_evict(4), 3);
        assert_eq!(Eviction::Fraction(0.9).messages_to_evict(2), 1);
        assert_eq!(Eviction::Count(3).messages_to_evict(1), 0);
    }

    #[test]
    fn test_plan_due() {
        let profile = AgentProfile::new("A").with_plan_frequency(3);
        assert!(!profile.plan_due(2));
        assert!(profile.plan_due(3));
        assert!(!AgentProfile::new("B").plan_due(100));
    }

    #[test]
    fn test_validate_rejects_bad_memory_policy() {
        let small = AgentProfile::new("A").with_memory(MemoryPolicy {
            max_messages: 1,
            eviction: Eviction::Count(1),
        });
        assert!(small.validate().is_err());

        let zero = AgentProfile::new("A").with_memory(MemoryPolicy {
            max_messages: 10,
            eviction: Eviction::Count(0),
        });
        assert!(zero.validate().is_err());

        let fraction = AgentProfile::new("A").with_memory(MemoryPolicy {
            max_messages: 10,
            eviction: Eviction::Fraction(1.0),
        });
        assert!(fraction.validate().is_err());

        assert!(AgentProfile::new("A").validate().is_ok());
        assert_eq!(
            AgentProfile::new(" ").validate(),
            Err(DomainError::EmptyAgentId)
        );
    }
}
