//! Port for structured session transcripts.
//!
//! Defines the [`ConversationLogger`] trait for recording what happened in
//! each turn (reasoning output, executed commands, plan and summary
//! updates, tallies) as machine-readable records, one per event.
//!
//! This is separate from `tracing`-based operation logs: tracing carries
//! human-readable diagnostics, this port carries the transcript.

use serde_json::Value;

/// Event type identifiers written by the turn engine
pub mod events {
    pub const TURN_STARTED: &str = "turn_started";
    pub const REASONING_OUTPUT: &str = "reasoning_output";
    pub const COMMAND_EXECUTED: &str = "command_executed";
    pub const PLAN_UPDATED: &str = "plan_updated";
    pub const SUMMARY_UPDATED: &str = "summary_updated";
    pub const VOTE_TALLY: &str = "vote_tally";
    pub const NOTIFICATION: &str = "notification";
    pub const TURN_ENDED: &str = "turn_ended";
}

/// A structured transcript event.
///
/// The adapter adds the timestamp when it writes the record.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationEvent {
    /// Event type identifier, one of [`events`]
    pub event_type: &'static str,
    /// Event-specific fields
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for writing transcript events.
///
/// `log` is synchronous and infallible; a failed write must not disturb
/// the turn.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
