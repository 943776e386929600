//! Reasoning engine and retry settings (`[reasoning]`, `[retry]`)
//!
//! ```toml
//! [reasoning]
//! base_url = "https://openrouter.ai/api/v1"
//! api_key_env = "OPENROUTER_KEY"
//! timeout_secs = 60
//! models = ["deepseek/deepseek-v3.2", "moonshotai/kimi-k2.5"]
//!
//! [retry]
//! max_attempts = 3
//! initial_backoff_ms = 500
//! max_backoff_ms = 10000
//! ```

use agora_application::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReasoningConfig {
    /// Chat-completions endpoint root
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Upper bound for a single call
    pub timeout_secs: u64,
    /// Models for agents that do not list their own
    pub models: Vec<String>,
}

impl Default for FileReasoningConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key_env: "OPENROUTER_KEY".to_string(),
            timeout_secs: 60,
            models: vec![
                "deepseek/deepseek-v3.2".to_string(),
                "moonshotai/kimi-k2.5".to_string(),
                "qwen/qwen3.5-plus-02-15".to_string(),
            ],
        }
    }
}

impl FileReasoningConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            initial_backoff_ms: policy.initial_backoff.as_millis() as u64,
            max_backoff_ms: policy.max_backoff.as_millis() as u64,
        }
    }
}

impl FileRetryConfig {
    pub fn to_policy(&self) -> Result<RetryPolicy, String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".to_string());
        }
        Ok(RetryPolicy::default()
            .with_max_attempts(self.max_attempts)
            .with_backoff(
                Duration::from_millis(self.initial_backoff_ms),
                Duration::from_millis(self.max_backoff_ms),
            ))
    }
}
