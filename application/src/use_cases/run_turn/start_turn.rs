//! StartTurn stage: background signals and the new assistant slot.

use super::TurnEngine;
use super::types::{Notification, RunTurnError, TurnReport};
use crate::ports::conversation_logger::events;
use agora_domain::command::effects::{GRAPH_REBUILT_NOTICE, JOB_FINISHED_NOTICE};
use agora_domain::{AgentId, Role, SessionDelta};
use serde_json::json;
use tracing::{debug, info, warn};

impl TurnEngine {
    /// Poll both background signals, broadcast what fired, clear the
    /// command queue and open the acting agent's assistant slot.
    pub(super) async fn start_turn(
        &mut self,
        agent: &AgentId,
        report: &mut TurnReport,
    ) -> Result<(), RunTurnError> {
        let order = self.state.agent_order().to_vec();
        let mut delta = SessionDelta::new();
        delta.replace_queue(Vec::new());

        if self.ports.rebuild.poll_rebuilt() {
            info!("Knowledge graph rebuilt, notifying agents");
            delta.fan_out_global(&order, agent, GRAPH_REBUILT_NOTICE, true);
            report.notifications.push(Notification::GraphRebuilt);
            self.log(events::NOTIFICATION, json!({ "notification": "graph_rebuilt" }));
        }

        if self.state.job_running() {
            match self.ports.queue.depth().await {
                Ok(0) => {
                    info!("Work queue '{}' drained, job finished", self.ports.queue.name());
                    delta
                        .set_job_running(false)
                        .fan_out_global(&order, agent, JOB_FINISHED_NOTICE, true);
                    report.notifications.push(Notification::JobFinished);
                    self.log(events::NOTIFICATION, json!({ "notification": "job_finished" }));
                }
                Ok(depth) => debug!("{} items left on '{}'", depth, self.ports.queue.name()),
                Err(e) => warn!("Could not read queue depth: {}", e),
            }
        }

        delta.push_message(agent, Role::Assistant);
        self.commit(&delta)
    }
}
