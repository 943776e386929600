//! Agent roster from TOML (`[[agents]]` array)
//!
//! ```toml
//! [[agents]]
//! id = "Skeptic"
//! models = ["deepseek/deepseek-v3.2"]   # falls back to [reasoning] models
//! plan_frequency = 3
//! max_memory = 15
//! delete_fraction = 0.5                  # or summary_delete = 4
//! ```

use agora_domain::agent::validation::{ConfigIssue, ConfigIssueCode};
use agora_domain::{AgentProfile, Eviction, MemoryPolicy};
use serde::{Deserialize, Serialize};

const DEFAULT_MAX_MEMORY: usize = 15;
const DEFAULT_DELETE_FRACTION: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub id: String,
    /// Models tried in order; empty means the `[reasoning]` defaults
    pub models: Vec<String>,
    /// Turns between replans; unset disables planning
    pub plan_frequency: Option<u32>,
    /// Memory length above which the oldest messages are summarized
    pub max_memory: usize,
    /// Evict exactly this many messages per summary
    pub summary_delete: Option<usize>,
    /// Evict this fraction of memory per summary
    pub delete_fraction: Option<f64>,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            models: Vec::new(),
            plan_frequency: None,
            max_memory: DEFAULT_MAX_MEMORY,
            summary_delete: None,
            delete_fraction: None,
        }
    }
}

impl FileAgentConfig {
    pub fn named(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// The two agents a session starts with when none are configured
    pub fn default_roster() -> Vec<Self> {
        vec![Self::named("Agent 1"), Self::named("Agent 2")]
    }

    /// An explicit count wins over a fraction
    pub fn eviction(&self) -> Eviction {
        match (self.summary_delete, self.delete_fraction) {
            (Some(count), _) => Eviction::Count(count),
            (None, Some(fraction)) => Eviction::Fraction(fraction),
            (None, None) => Eviction::Fraction(DEFAULT_DELETE_FRACTION),
        }
    }

    /// Build the domain profile. Bounds are checked by the roster.
    pub fn to_profile(&self, default_models: &[String]) -> AgentProfile {
        let models = if self.models.is_empty() {
            default_models.to_vec()
        } else {
            self.models.clone()
        };
        let profile = AgentProfile::new(self.id.as_str())
            .with_models(models)
            .with_memory(MemoryPolicy {
                max_messages: self.max_memory,
                eviction: self.eviction(),
            });
        match self.plan_frequency {
            Some(frequency) => profile.with_plan_frequency(frequency),
            None => profile,
        }
    }

    pub fn issues(&self, default_models: &[String]) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.models.is_empty() && default_models.is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NoModels {
                    agent: self.id.clone(),
                },
                format!(
                    "agent '{}' has no models and [reasoning] models is empty; the gateway default is used",
                    self.id
                ),
            ));
        }
        if self.summary_delete.is_some() && self.delete_fraction.is_some() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ConflictingEviction {
                    agent: self.id.clone(),
                },
                format!(
                    "agent '{}' sets both summary_delete and delete_fraction; summary_delete is used",
                    self.id
                ),
            ));
        }
        issues
    }
}
