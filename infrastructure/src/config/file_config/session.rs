//! Session settings from TOML (`[session]` section)
//!
//! ```toml
//! [session]
//! objective = "Find hyperparameters that raise test accuracy"
//! max_rounds = 50
//! state_path = "data/state.json"
//! seed = 42
//! quorum_rule = "majority"     # or "unanimous", "atleast:N"
//! ```

use agora_domain::QuorumRule;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Research objective shown to every agent
    pub objective: String,
    /// Total rounds after which the session stops; unset runs until halted
    pub max_rounds: Option<u64>,
    /// Where the session state is persisted between turns
    pub state_path: PathBuf,
    /// Seed for random node and example picks
    pub seed: Option<u64>,
    pub quorum_rule: String,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            objective: String::new(),
            max_rounds: None,
            state_path: PathBuf::from("data/state.json"),
            seed: None,
            quorum_rule: "majority".to_string(),
        }
    }
}

impl FileSessionConfig {
    pub fn parse_rule(&self) -> Result<QuorumRule, String> {
        self.quorum_rule.parse()
    }
}
