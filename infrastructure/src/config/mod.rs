//! Configuration file loading for agora
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables prefixed `AGORA_` (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./agora.toml` or `./.agora.toml`
//! 4. Global: `$XDG_CONFIG_HOME/agora/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileAgentConfig, FileConfig, FileGenerationConfig, FileGraphConfig, FileLoggingConfig,
    FileQueueConfig, FileReasoningConfig, FileRetryConfig, FileSessionConfig,
};
pub use loader::ConfigLoader;

use agora_domain::DomainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid agent configuration: {0}")]
    Agents(#[from] DomainError),

    #[error("Invalid quorum rule: {0}")]
    QuorumRule(String),

    #[error("Invalid retry configuration: {0}")]
    Retry(String),

    #[error("[generation] interpreter requires [queue] spool_dir; generated experiments need an external worker")]
    QueueWithoutWorker,
}
