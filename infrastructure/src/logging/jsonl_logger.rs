//! JSONL transcript writer.
//!
//! Every [`ConversationEvent`] becomes one line carrying `type`,
//! `timestamp` and `seq` next to the event payload. The file is opened in
//! append mode so a resumed session continues its transcript.

use agora_application::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

struct Sink {
    writer: BufWriter<File>,
    seq: u64,
}

pub struct JsonlConversationLogger {
    sink: Mutex<Sink>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open `path` for appending, creating parent directories.
    ///
    /// Returns `None` (after a warning) if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create transcript directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open transcript {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            sink: Mutex::new(Sink {
                writer: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn record(event: ConversationEvent, seq: u64) -> Value {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    let mut map = match event.payload {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => Map::from_iter([("data".to_string(), other)]),
    };
    map.insert("type".to_string(), Value::from(event.event_type));
    map.insert("timestamp".to_string(), Value::from(timestamp));
    map.insert("seq".to_string(), Value::from(seq));
    Value::Object(map)
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut sink) = self.sink.lock() else {
            return;
        };
        let line = match serde_json::to_string(&record(event, sink.seq)) {
            Ok(line) => line,
            Err(e) => {
                warn!("Dropped transcript record: {}", e);
                return;
            }
        };
        sink.seq += 1;

        // One flush per record so a crash loses at most the current line
        if writeln!(sink.writer, "{}", line)
            .and_then(|_| sink.writer.flush())
            .is_err()
        {
            warn!("Could not write to transcript {}", self.path.display());
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_application::ports::conversation_logger::events;
    use serde_json::json;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_records_carry_type_timestamp_and_seq() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/session.jsonl");
        let logger = JsonlConversationLogger::open(&path).unwrap();

        logger.log(ConversationEvent::new(
            events::TURN_STARTED,
            json!({"agent": "Agent 1", "turn": 0, "round": 0}),
        ));
        logger.log(ConversationEvent::new(
            events::COMMAND_EXECUTED,
            json!({"agent": "Agent 1", "command": "vote", "accepted": false}),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "turn_started");
        assert_eq!(lines[0]["agent"], "Agent 1");
        assert_eq!(lines[0]["seq"], 0);
        assert!(lines[0]["timestamp"].as_str().unwrap().ends_with('Z'));
        assert_eq!(lines[1]["type"], "command_executed");
        assert_eq!(lines[1]["accepted"], false);
        assert_eq!(lines[1]["seq"], 1);
    }

    #[test]
    fn test_scalar_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        let logger = JsonlConversationLogger::open(&path).unwrap();

        logger.log(ConversationEvent::new(events::NOTIFICATION, json!("graph rebuilt")));
        logger.log(ConversationEvent::new(events::TURN_ENDED, Value::Null));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["data"], "graph rebuilt");
        assert!(lines[1].get("data").is_none());
    }

    #[test]
    fn test_reopen_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");

        for turn in 0..2 {
            let logger = JsonlConversationLogger::open(&path).unwrap();
            logger.log(ConversationEvent::new(events::TURN_STARTED, json!({"turn": turn})));
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["turn"], 1);
    }

    #[test]
    fn test_unopenable_path_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be opened as a file
        assert!(JsonlConversationLogger::open(dir.path()).is_none());
    }
}
