//! Subprocess script runner.
//!
//! The script body plus a small driver is written to the interpreter's
//! stdin. The driver prints the return value of `generate_experiments()`
//! as JSON; the last non-empty stdout line is parsed as the record list.

use agora_application::{ScriptError, ScriptRunner};
use async_trait::async_trait;
use serde_json::Value;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

const DRIVER: &str = "\n\nif __name__ == \"__main__\":\n    import json\n    print(json.dumps(generate_experiments()))\n";

/// Keep error messages readable when a script dumps a traceback
const MAX_STDERR: usize = 2000;

pub struct ProcessScriptRunner {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessScriptRunner {
    /// `interpreter` is a program followed by whitespace-separated
    /// arguments, e.g. `python3` or `uv run python`.
    pub fn new(interpreter: &str, timeout: Duration) -> Option<Self> {
        let mut parts = interpreter.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            timeout,
        })
    }

    fn program_text(script: &str) -> String {
        let mut text = String::with_capacity(script.len() + DRIVER.len());
        text.push_str(script);
        text.push_str(DRIVER);
        text
    }
}

fn parse_records(stdout: &str) -> Result<Vec<Value>, ScriptError> {
    let last = stdout
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| ScriptError::InvalidOutput("no output".to_string()))?;
    match serde_json::from_str(last) {
        Ok(Value::Array(records)) => Ok(records),
        Ok(other) => Err(ScriptError::InvalidOutput(format!(
            "expected a list, got {}",
            other
        ))),
        Err(e) => Err(ScriptError::InvalidOutput(e.to_string())),
    }
}

#[async_trait]
impl ScriptRunner for ProcessScriptRunner {
    async fn execute(&self, script: &str) -> Result<Vec<Value>, ScriptError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ScriptError::Spawn(format!("{}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            // An interpreter that exits early closes the pipe; its exit
            // status carries the real error
            if let Err(e) = stdin.write_all(Self::program_text(script).as_bytes()).await {
                debug!("Could not write script to {}: {}", self.program, e);
            }
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ScriptError::Timeout(self.timeout))?
            .map_err(|e| ScriptError::Spawn(e.to_string()))?;

        if !output.status.success() {
            let mut stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.len() > MAX_STDERR {
                let mut cut = MAX_STDERR;
                while !stderr.is_char_boundary(cut) {
                    cut -= 1;
                }
                stderr.truncate(cut);
                stderr.push_str("...");
            }
            return Err(ScriptError::Failed {
                status: output.status.to_string(),
                stderr,
            });
        }

        let records = parse_records(&String::from_utf8_lossy(&output.stdout))?;
        info!("Generation script produced {} record(s)", records.len());
        Ok(records)
    }
}
