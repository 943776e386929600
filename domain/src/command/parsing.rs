//! Extracting the command queue from reasoning output.

use super::entities::QueuedCommand;
use serde_json::Value;

/// Parse `{"commands": [{"command": "...", ...}, ...]}` into a queue.
///
/// Output that is not JSON, lacks a `commands` array, or has entries
/// without a `command` key yields fewer (possibly zero) commands rather
/// than an error. A surrounding ```` ```json ```` fence is tolerated.
pub fn parse_command_queue(output: &str) -> Vec<QueuedCommand> {
    let Some(value) = parse_json(output) else {
        return Vec::new();
    };
    let Some(commands) = value.get("commands").and_then(Value::as_array) else {
        return Vec::new();
    };

    commands
        .iter()
        .filter_map(|entry| {
            let mut params = entry.as_object()?.clone();
            let name = match params.remove("command")? {
                Value::String(s) => s,
                other => other.to_string(),
            };
            Some(QueuedCommand { name, params })
        })
        .collect()
}

fn parse_json(output: &str) -> Option<Value> {
    let trimmed = output.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    // ```json ... ``` blocks
    let body = trimmed.strip_prefix("```")?;
    let body = body.split_once('\n').map(|(_, rest)| rest)?;
    let body = body.trim_end().strip_suffix("```")?;
    serde_json::from_str(body).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands_in_order() {
        let output = r#"{"commands": [
            {"command": "vote"},
            {"command": "message", "content": "x"}
        ]}"#;
        let queue = parse_command_queue(output);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].name, "vote");
        assert!(queue[0].params.is_empty());
        assert_eq!(queue[1].name, "message");
        assert_eq!(queue[1].params["content"], "x");
    }

    #[test]
    fn test_entries_without_command_are_skipped() {
        let output = r#"{"commands": [{"content": "orphan"}, "vote", {"command": "vote"}]}"#;
        let queue = parse_command_queue(output);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].name, "vote");
    }

    #[test]
    fn test_malformed_output_is_empty_queue() {
        assert!(parse_command_queue("I think we should vote.").is_empty());
        assert!(parse_command_queue("[1, 2, 3]").is_empty());
        assert!(parse_command_queue(r#"{"commands": "vote"}"#).is_empty());
        assert!(parse_command_queue("").is_empty());
    }

    #[test]
    fn test_fenced_json() {
        let output = "```json\n{\"commands\": [{\"command\": \"vote\"}]}\n```";
        assert_eq!(parse_command_queue(output).len(), 1);
    }
}
