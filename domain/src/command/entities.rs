//! Queued and validated commands.

use super::script;
use crate::graph::{NodeId, TraversalAlgorithm};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Most nodes a single traverse may return
pub const MAX_TRAVERSAL_COUNT: i64 = 10;

/// A command as produced by the reasoning engine: a tag plus its raw
/// parameter object. Validation happens at dispatch, not at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedCommand {
    pub name: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl QueuedCommand {
    /// Non-object `params` are treated as empty
    pub fn new(name: impl Into<String>, params: Value) -> Self {
        let params = match params {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            name: name.into(),
            params,
        }
    }
}

/// Why a queued command could not be turned into a [`Command`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Invalid parameters for '{command}': {reason}")]
    InvalidParameters { command: String, reason: String },
}

/// Where a traversal starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartNode {
    /// Pick a node uniformly at random
    Random,
    Id(NodeId),
}

/// A validated command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Open a vote on an experiment generation script
    Propose { code: String },
    Vote,
    /// Broadcast to every other agent
    Message { content: String },
    Traverse {
        start: StartNode,
        algorithm: TraversalAlgorithm,
        max_count: usize,
    },
    /// Fetch one random example supporting a node
    Example { node_id: i64 },
}

impl Command {
    /// Every accepted command tag
    pub const TAGS: [&'static str; 5] = ["propose", "vote", "message", "traverse", "example"];

    pub fn tag(&self) -> &'static str {
        match self {
            Command::Propose { .. } => "propose",
            Command::Vote => "vote",
            Command::Message { .. } => "message",
            Command::Traverse { .. } => "traverse",
            Command::Example { .. } => "example",
        }
    }
}

/// Wire shape, checked by serde before the semantic checks below
#[derive(Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
enum RawCommand {
    Propose {
        code: String,
    },
    Vote,
    Message {
        content: String,
    },
    Traverse {
        #[serde(alias = "hyp_id")]
        node_id: i64,
        algorithm: TraversalAlgorithm,
        max_count: i64,
    },
    Example {
        #[serde(alias = "hyp_id")]
        node_id: i64,
    },
}

impl TryFrom<&QueuedCommand> for Command {
    type Error = CommandError;

    fn try_from(queued: &QueuedCommand) -> Result<Self, Self::Error> {
        let name = queued.name.as_str();
        if !Command::TAGS.contains(&name) {
            return Err(CommandError::Unknown(queued.name.clone()));
        }

        let invalid = |reason: String| CommandError::InvalidParameters {
            command: queued.name.clone(),
            reason,
        };

        let mut object = queued.params.clone();
        object.insert("command".to_string(), Value::String(queued.name.clone()));
        let raw: RawCommand =
            serde_json::from_value(Value::Object(object)).map_err(|e| invalid(e.to_string()))?;

        match raw {
            RawCommand::Propose { code } => {
                script::check_format(&code).map_err(|e| invalid(e.to_string()))?;
                Ok(Command::Propose { code })
            }
            RawCommand::Vote => Ok(Command::Vote),
            RawCommand::Message { content } => {
                if content.is_empty() {
                    return Err(invalid("content must not be empty".to_string()));
                }
                Ok(Command::Message { content })
            }
            RawCommand::Traverse {
                node_id,
                algorithm,
                max_count,
            } => {
                let start = match node_id {
                    0 => return Err(invalid("node id cannot be 0".to_string())),
                    n if n < 0 => StartNode::Random,
                    n => StartNode::Id(n.unsigned_abs()),
                };
                if !(1..=MAX_TRAVERSAL_COUNT).contains(&max_count) {
                    return Err(invalid(format!(
                        "max_count must be between 1 and {}",
                        MAX_TRAVERSAL_COUNT
                    )));
                }
                Ok(Command::Traverse {
                    start,
                    algorithm,
                    max_count: max_count.unsigned_abs() as usize,
                })
            }
            RawCommand::Example { node_id } => Ok(Command::Example { node_id }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(name: &str, params: Value) -> Result<Command, CommandError> {
        Command::try_from(&QueuedCommand::new(name, params))
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(
            parse("dance", json!({})),
            Err(CommandError::Unknown("dance".to_string()))
        );
    }

    #[test]
    fn test_vote_ignores_extra_params() {
        assert_eq!(parse("vote", json!({"reason": "looks good"})), Ok(Command::Vote));
    }

    #[test]
    fn test_message_requires_content() {
        assert!(parse("message", json!({})).is_err());
        assert!(parse("message", json!({"content": ""})).is_err());
        assert_eq!(
            parse("message", json!({"content": "  "})),
            Ok(Command::Message {
                content: "  ".to_string()
            })
        );
        assert_eq!(
            parse("message", json!({"content": "hello"})),
            Ok(Command::Message {
                content: "hello".to_string()
            })
        );
    }

    #[test]
    fn test_traverse_validation() {
        assert!(parse("traverse", json!({"node_id": 0, "algorithm": "bfs", "max_count": 3})).is_err());
        assert!(parse("traverse", json!({"node_id": 1, "algorithm": "bfs", "max_count": 11})).is_err());
        assert!(parse("traverse", json!({"node_id": 1, "algorithm": "bfs", "max_count": 0})).is_err());
        assert!(parse("traverse", json!({"node_id": 1, "algorithm": "astar", "max_count": 3})).is_err());

        assert_eq!(
            parse("traverse", json!({"hyp_id": -1, "algorithm": "dfs", "max_count": 10})),
            Ok(Command::Traverse {
                start: StartNode::Random,
                algorithm: TraversalAlgorithm::Dfs,
                max_count: 10
            })
        );
        assert_eq!(
            parse("traverse", json!({"node_id": 7, "algorithm": "bfs", "max_count": 1})),
            Ok(Command::Traverse {
                start: StartNode::Id(7),
                algorithm: TraversalAlgorithm::Bfs,
                max_count: 1
            })
        );
    }

    #[test]
    fn test_propose_checks_format() {
        let error = parse("propose", json!({"code": "print('hi')"})).unwrap_err();
        assert!(matches!(error, CommandError::InvalidParameters { .. }));

        let code = "```python\ndef generate_experiments():\n    return []\n```";
        assert_eq!(
            parse("propose", json!({"code": code})),
            Ok(Command::Propose {
                code: code.to_string()
            })
        );
    }
}
