//! Background collaborators (`[graph]`, `[queue]`, `[generation]`)
//!
//! ```toml
//! [graph]
//! path = "data/graph.json"
//! examples_path = "data/experiments.jsonl"
//! poll_interval_secs = 30
//!
//! [queue]
//! name = "experiments"
//! spool_dir = "data/queue"     # required when an interpreter is set
//!
//! [generation]
//! interpreter = "python3"      # unset disables script execution
//! timeout_secs = 120
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGraphConfig {
    /// Graph document written by the rebuild pipeline
    pub path: PathBuf,
    /// One example per line; the line index is the example id
    pub examples_path: PathBuf,
    /// How often the graph file is checked for changes
    pub poll_interval_secs: u64,
}

impl Default for FileGraphConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/graph.json"),
            examples_path: PathBuf::from("data/experiments.jsonl"),
            poll_interval_secs: 30,
        }
    }
}

impl FileGraphConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileQueueConfig {
    pub name: String,
    /// Spool directory shared with the batch worker
    pub spool_dir: Option<PathBuf>,
}

impl Default for FileQueueConfig {
    fn default() -> Self {
        Self {
            name: "experiments".to_string(),
            spool_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    /// Interpreter that runs proposal scripts
    pub interpreter: Option<String>,
    pub timeout_secs: u64,
}

impl Default for FileGenerationConfig {
    fn default() -> Self {
        Self {
            interpreter: None,
            timeout_secs: 120,
        }
    }
}

impl FileGenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_defaults() {
        let config = super::super::FileConfig::default();
        assert_eq!(config.graph.path, PathBuf::from("data/graph.json"));
        assert_eq!(config.queue.name, "experiments");
        assert!(config.queue.spool_dir.is_none());
        assert!(config.generation.interpreter.is_none());
    }

    #[test]
    fn test_worker_sections_deserialize() {
        let toml_str = r#"
[graph]
path = "/tmp/g.json"
poll_interval_secs = 0

[queue]
spool_dir = "/tmp/spool"

[generation]
interpreter = "python3"
timeout_secs = 10
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.graph.path, PathBuf::from("/tmp/g.json"));
        assert_eq!(config.graph.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.queue.spool_dir, Some(PathBuf::from("/tmp/spool")));
        assert_eq!(config.generation.interpreter.as_deref(), Some("python3"));
        assert_eq!(config.generation.timeout(), Duration::from_secs(10));
    }
}
