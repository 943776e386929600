//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into the engine's
//! [`EngineConfig`] by [`FileConfig::to_engine_config`].

mod agent;
mod logging;
mod reasoning;
mod session;
mod workers;

pub use agent::FileAgentConfig;
pub use logging::FileLoggingConfig;
pub use reasoning::{FileReasoningConfig, FileRetryConfig};
pub use session::FileSessionConfig;
pub use workers::{FileGenerationConfig, FileGraphConfig, FileQueueConfig};

use super::ConfigError;
use agora_application::EngineConfig;
use agora_domain::AgentRoster;
use agora_domain::agent::validation::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub session: FileSessionConfig,
    /// Agents in turn order
    pub agents: Vec<FileAgentConfig>,
    pub reasoning: FileReasoningConfig,
    pub retry: FileRetryConfig,
    pub graph: FileGraphConfig,
    pub queue: FileQueueConfig,
    pub generation: FileGenerationConfig,
    pub logging: FileLoggingConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            session: FileSessionConfig::default(),
            agents: FileAgentConfig::default_roster(),
            reasoning: FileReasoningConfig::default(),
            retry: FileRetryConfig::default(),
            graph: FileGraphConfig::default(),
            queue: FileQueueConfig::default(),
            generation: FileGenerationConfig::default(),
            logging: FileLoggingConfig::default(),
        }
    }
}

impl FileConfig {
    /// Non-fatal issues worth a warning at startup.
    ///
    /// Fatal problems are reported by [`FileConfig::to_engine_config`].
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues: Vec<ConfigIssue> = self
            .agents
            .iter()
            .flat_map(|agent| agent.issues(&self.reasoning.models))
            .collect();

        if self.generation.interpreter.is_none() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::GenerationDisabled,
                "[generation] interpreter is not set; passed proposals will not run",
            ));
        }

        issues
    }

    /// Check that the API key variable is present in `env`
    pub fn api_key_issue(&self, env: impl Fn(&str) -> Option<String>) -> Option<ConfigIssue> {
        let variable = &self.reasoning.api_key_env;
        if env(variable).is_some_and(|v| !v.is_empty()) {
            return None;
        }
        Some(ConfigIssue::warning(
            ConfigIssueCode::MissingApiKey {
                variable: variable.clone(),
            },
            format!("{} is not set; reasoning calls will be rejected", variable),
        ))
    }

    /// Build the validated engine configuration
    pub fn to_engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let profiles = self
            .agents
            .iter()
            .map(|agent| agent.to_profile(&self.reasoning.models))
            .collect();
        let roster = AgentRoster::new(profiles)?;
        let quorum_rule = self
            .session
            .parse_rule()
            .map_err(ConfigError::QuorumRule)?;
        let retry = self.retry.to_policy().map_err(ConfigError::Retry)?;
        // Nothing in this process drains the in-memory queue
        if self.generation.interpreter.is_some() && self.queue.spool_dir.is_none() {
            return Err(ConfigError::QueueWithoutWorker);
        }

        let config = EngineConfig::new(roster)
            .with_objective(self.session.objective.clone())
            .with_quorum_rule(quorum_rule)
            .with_retry(retry)
            .with_call_timeout(self.reasoning.timeout());
        Ok(match self.session.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        })
    }
}
