use agora_application::{ScriptError, ScriptRunner};
use async_trait::async_trait;
use serde_json::Value;

/// Runner used when no interpreter is configured
pub struct DisabledScriptRunner;

#[async_trait]
impl ScriptRunner for DisabledScriptRunner {
    async fn execute(&self, _script: &str) -> Result<Vec<Value>, ScriptError> {
        Err(ScriptError::Disabled)
    }
}
