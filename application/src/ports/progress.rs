//! Progress notification port
//!
//! Defines the interface for reporting progress while a session runs.

use crate::use_cases::run_turn::TurnReport;
use agora_domain::{AgentId, Tally, TurnCursor};

/// Stage of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    StartTurn,
    Reason,
    Plan,
    Summarize,
    Commands,
    EndTurn,
}

impl TurnStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnStage::StartTurn => "start_turn",
            TurnStage::Reason => "reason",
            TurnStage::Plan => "plan",
            TurnStage::Summarize => "summarize",
            TurnStage::Commands => "commands",
            TurnStage::EndTurn => "end_turn",
        }
    }
}

/// Callback for progress updates during a session
///
/// Implementations live in the presentation layer. Every method has an
/// empty default so an implementation only overrides what it shows.
pub trait TurnProgressNotifier: Send + Sync {
    /// Called when an agent's turn begins
    fn on_turn_start(&self, _agent: &AgentId, _cursor: TurnCursor) {}

    /// Called when a stage begins
    fn on_stage(&self, _agent: &AgentId, _stage: TurnStage) {}

    /// Called after each dispatched command
    fn on_command(&self, _agent: &AgentId, _command: &str, _ok: bool) {}

    /// Called when a vote closes
    fn on_tally(&self, _tally: &Tally) {}

    /// Called when an agent's turn is complete
    fn on_turn_end(&self, _report: &TurnReport) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl TurnProgressNotifier for NoProgress {}
