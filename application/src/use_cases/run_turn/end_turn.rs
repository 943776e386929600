//! EndTurn stage: advance the cursor and close a vote that came around.

use super::TurnEngine;
use super::types::{RunTurnError, TurnReport};
use crate::ports::conversation_logger::events;
use crate::ports::progress::TurnProgressNotifier;
use agora_domain::command::effects;
use agora_domain::command::script::extract_script;
use agora_domain::SessionDelta;
use serde_json::json;
use tracing::{info, warn};

impl TurnEngine {
    /// Advance the turn cursor. When a proposal is open and the next agent
    /// is its proposer, tally it; a passed vote runs the generation script
    /// and hands the records to the work queue.
    pub(super) async fn end_turn(
        &mut self,
        progress: &dyn TurnProgressNotifier,
        report: &mut TurnReport,
    ) -> Result<(), RunTurnError> {
        let next = self.state.cursor().advance(self.state.n_agents());
        let mut delta = SessionDelta::new();
        delta.set_cursor(next);

        let closing = self
            .state
            .proposal()
            .filter(|p| p.proposer() == &self.state.agent_order()[next.turn])
            .cloned();

        if let Some(proposal) = closing {
            let tally = proposal.tally(self.state.n_agents(), self.config.quorum_rule);
            info!(
                "Vote on {}'s proposal closed: {}/{} ({})",
                proposal.proposer(),
                tally.votes,
                tally.n_agents,
                if tally.passed { "passed" } else { "failed" }
            );

            let dispatch_error = if tally.passed {
                self.dispatch_generation(proposal.text())
                    .await
                    .inspect_err(|e| warn!("Experiment generation failed: {}", e))
                    .err()
            } else {
                None
            };

            delta.extend(effects::close_vote(
                &self.state,
                &tally,
                dispatch_error.as_deref(),
            ));
            progress.on_tally(&tally);
            self.log(
                events::VOTE_TALLY,
                json!({
                    "proposer": proposal.proposer(),
                    "votes": tally.votes,
                    "n_agents": tally.n_agents,
                    "passed": tally.passed,
                    "dispatch_error": dispatch_error,
                }),
            );
            report.tally = Some(tally);
        }

        self.commit(&delta)?;
        report.cursor_after = next;
        Ok(())
    }

    /// Run the proposal's script and enqueue its records.
    async fn dispatch_generation(&self, code: &str) -> Result<usize, String> {
        let script = extract_script(code).map_err(|e| e.to_string())?;
        let records = self
            .ports
            .scripts
            .execute(script)
            .await
            .map_err(|e| e.to_string())?;
        let pushed = self
            .ports
            .queue
            .push(records)
            .await
            .map_err(|e| e.to_string())?;
        info!("Enqueued {} experiment(s) on '{}'", pushed, self.ports.queue.name());
        Ok(pushed)
    }
}
