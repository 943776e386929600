//! Script runner port
//!
//! Runs the generation script of a passed proposal and returns the
//! experiment records it produced. The engine never executes agent code
//! itself; sandboxing is the adapter's concern.

use agora_domain::command::ScriptFormatError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("script execution is disabled")]
    Disabled,

    #[error("{0}")]
    Format(#[from] ScriptFormatError),

    #[error("failed to start interpreter: {0}")]
    Spawn(String),

    #[error("script timed out after {0:?}")]
    Timeout(Duration),

    #[error("script exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("script output is not a JSON list: {0}")]
    InvalidOutput(String),
}

#[async_trait]
pub trait ScriptRunner: Send + Sync {
    /// Run a script body and collect the records `generate_experiments()`
    /// returned
    async fn execute(&self, script: &str) -> Result<Vec<Value>, ScriptError>;
}
