//! Plan stage: cadence-gated replanning.

use super::TurnEngine;
use super::types::{PlanOutcome, RunTurnError, TurnReport};
use crate::ports::conversation_logger::events;
use crate::ports::llm_gateway::{CompletionRequest, ResponseFormat};
use agora_domain::memory::interaction_text;
use agora_domain::{AgentId, AgentProfile, AgentPromptTemplate, ChatMessage, DomainError, SessionDelta};
use serde_json::json;
use tracing::{debug, info, warn};

impl TurnEngine {
    /// Increment the plan counter, or replan once it reaches the agent's
    /// frequency.
    ///
    /// A `PLAN_INCOMPLETE` reply or a failed call leaves plan and counter
    /// as they are, so planning is attempted again next turn.
    pub(super) async fn plan(
        &mut self,
        agent: &AgentId,
        profile: &AgentProfile,
        report: &mut TurnReport,
    ) -> Result<(), RunTurnError> {
        if profile.plan_frequency.is_none() {
            return Ok(());
        }

        let record = self
            .state
            .agent(agent)
            .ok_or_else(|| DomainError::UnknownAgent(agent.to_string()))?
            .clone();

        let mut delta = SessionDelta::new();
        if !profile.plan_due(record.plan_counter) {
            delta.set_plan_counter(agent, record.plan_counter + 1);
            report.plan = PlanOutcome::Waiting;
            return self.commit(&delta);
        }

        let prompt = AgentPromptTemplate::planner_prompt(
            agent,
            &self.config.objective,
            &interaction_text(&record.memory),
            &record.plan,
            &record.summary,
        );
        let request = CompletionRequest {
            agent: agent.clone(),
            models: profile.models.clone(),
            messages: vec![ChatMessage::system(prompt)],
            format: ResponseFormat::Text,
        };

        match self.complete("planning call", &request).await {
            Ok(completion) if AgentPromptTemplate::is_plan_incomplete(&completion.content) => {
                debug!("Planner for {} reported an incomplete plan", agent);
                report.plan = PlanOutcome::Incomplete;
            }
            Ok(completion) => {
                info!("New plan for {}", agent);
                let system_prompt = AgentPromptTemplate::system_prompt(
                    self.state.agent_order(),
                    agent,
                    &self.config.objective,
                    &completion.content,
                    &record.summary,
                );
                self.log(
                    events::PLAN_UPDATED,
                    json!({ "agent": agent, "plan": completion.content }),
                );
                delta
                    .set_plan(agent, completion.content)
                    .set_system_prompt(agent, system_prompt)
                    .set_plan_counter(agent, 0);
                report.plan = PlanOutcome::Updated;
            }
            Err(e) => {
                warn!("Planning call for {} failed: {}", agent, e);
                delta.personal_output(agent, format!("[ERROR] Planning call failed: {}\n\n", e));
                report.plan = PlanOutcome::Failed;
            }
        }

        self.commit(&delta)
    }
}
