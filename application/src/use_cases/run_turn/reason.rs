//! Reason stage: one reasoning call that fills the command queue.

use super::TurnEngine;
use super::types::{RunTurnError, TurnReport};
use crate::ports::conversation_logger::events;
use crate::ports::llm_gateway::{CompletionRequest, ResponseFormat};
use agora_domain::core::string::truncate;
use agora_domain::memory::reasoning_context;
use agora_domain::{AgentId, AgentProfile, DomainError, Role, SessionDelta, parse_command_queue};
use serde_json::json;
use tracing::{debug, warn};

impl TurnEngine {
    /// Ask the reasoning engine for this turn's commands.
    ///
    /// Unparseable output yields an empty queue. A failed call is reported
    /// to the agent and also yields an empty queue.
    pub(super) async fn reason(
        &mut self,
        agent: &AgentId,
        profile: &AgentProfile,
        report: &mut TurnReport,
    ) -> Result<(), RunTurnError> {
        let record = self
            .state
            .agent(agent)
            .ok_or_else(|| DomainError::UnknownAgent(agent.to_string()))?;
        let request = CompletionRequest {
            agent: agent.clone(),
            models: profile.models.clone(),
            messages: reasoning_context(&record.system_prompt, self.state.memory(agent)),
            format: ResponseFormat::Json,
        };

        let mut delta = SessionDelta::new();
        match self.complete("reasoning call", &request).await {
            Ok(completion) => {
                let queue = parse_command_queue(&completion.content);
                debug!(
                    "{} ({}) issued {} command(s): {}",
                    agent,
                    completion.model,
                    queue.len(),
                    truncate(&completion.content, 200)
                );
                self.log(
                    events::REASONING_OUTPUT,
                    json!({
                        "agent": agent,
                        "model": completion.model,
                        "output": completion.content,
                        "commands": queue.len(),
                    }),
                );
                delta
                    .model_output(agent, completion.content)
                    .push_message(agent, Role::User)
                    .replace_queue(queue);
                report.model = Some(completion.model);
            }
            Err(e) => {
                warn!("Reasoning call for {} failed: {}", agent, e);
                delta
                    .push_message(agent, Role::User)
                    .personal_output(agent, format!("[ERROR] Reasoning call failed: {}\n\n", e))
                    .replace_queue(Vec::new());
                report.reasoning_failed = true;
            }
        }

        self.commit(&delta)
    }
}
