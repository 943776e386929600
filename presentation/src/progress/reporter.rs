//! Progress reporting for session runs

use crate::output::console::ConsoleFormatter;
use agora_application::{TurnProgressNotifier, TurnReport, TurnStage};
use agora_domain::{AgentId, TurnCursor};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Spinner showing the current agent and stage, with a line per
/// completed turn printed above it
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn stage_label(stage: TurnStage) -> &'static str {
        match stage {
            TurnStage::StartTurn => "checking notifications...",
            TurnStage::Reason => "reasoning...",
            TurnStage::Plan => "planning...",
            TurnStage::Summarize => "summarizing memory...",
            TurnStage::Commands => "running commands...",
            TurnStage::EndTurn => "closing turn...",
        }
    }

    /// Remove the spinner
    pub fn finish(&self) {
        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(pb) = spinner.take()
        {
            pb.finish_and_clear();
        }
    }

    fn with_spinner(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(spinner) = self.spinner.lock()
            && let Some(pb) = spinner.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnProgressNotifier for ProgressReporter {
    fn on_turn_start(&self, agent: &AgentId, _cursor: TurnCursor) {
        let Ok(mut spinner) = self.spinner.lock() else {
            return;
        };
        let pb = spinner.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        pb.set_prefix(agent.to_string());
        pb.set_message("starting...");
    }

    fn on_stage(&self, _agent: &AgentId, stage: TurnStage) {
        self.with_spinner(|pb| pb.set_message(Self::stage_label(stage)));
    }

    fn on_command(&self, _agent: &AgentId, command: &str, ok: bool) {
        let status = if ok {
            format!("{} {}", "v".green(), command)
        } else {
            format!("{} {}", "x".red(), command)
        };
        self.with_spinner(|pb| pb.set_message(status));
    }

    fn on_turn_end(&self, report: &TurnReport) {
        let line = ConsoleFormatter::turn_line(report);
        self.with_spinner(|pb| pb.println(line));
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl TurnProgressNotifier for SimpleProgress {
    fn on_turn_end(&self, report: &TurnReport) {
        println!("{}", ConsoleFormatter::turn_line(report));
    }
}
