//! Summarize stage: fold the oldest memory into the running summary.

use super::TurnEngine;
use super::types::{RunTurnError, TurnReport};
use crate::ports::conversation_logger::events;
use crate::ports::llm_gateway::{CompletionRequest, ResponseFormat};
use agora_domain::memory::interaction_text;
use agora_domain::{AgentId, AgentProfile, AgentPromptTemplate, ChatMessage, DomainError, SessionDelta};
use serde_json::json;
use tracing::{info, warn};

impl TurnEngine {
    pub(super) async fn summarize(
        &mut self,
        agent: &AgentId,
        profile: &AgentProfile,
        report: &mut TurnReport,
    ) -> Result<(), RunTurnError> {
        let record = self
            .state
            .agent(agent)
            .ok_or_else(|| DomainError::UnknownAgent(agent.to_string()))?
            .clone();

        let len = record.memory.len();
        if !profile.memory.needs_summary(len) {
            return Ok(());
        }
        let n_evict = profile.memory.eviction.messages_to_evict(len);
        if n_evict == 0 {
            return Ok(());
        }

        let prompt = AgentPromptTemplate::summary_prompt(
            &record.summary,
            &interaction_text(&record.memory[..n_evict]),
        );
        let request = CompletionRequest {
            agent: agent.clone(),
            models: profile.models.clone(),
            messages: vec![ChatMessage::system(prompt)],
            format: ResponseFormat::Text,
        };

        let mut delta = SessionDelta::new();
        match self.complete("summarization call", &request).await {
            Ok(completion) => {
                info!("Evicting {} of {} messages for {}", n_evict, len, agent);
                let system_prompt = AgentPromptTemplate::system_prompt(
                    self.state.agent_order(),
                    agent,
                    &self.config.objective,
                    &record.plan,
                    &completion.content,
                );
                self.log(
                    events::SUMMARY_UPDATED,
                    json!({
                        "agent": agent,
                        "evicted": n_evict,
                        "summary": completion.content,
                    }),
                );
                delta
                    .evict(agent, n_evict)
                    .set_summary(agent, completion.content)
                    .set_system_prompt(agent, system_prompt);
                report.evicted = n_evict;
            }
            Err(e) => {
                warn!("Summarization for {} failed, keeping memory: {}", agent, e);
                delta.personal_output(agent, format!("[ERROR] Summarization failed: {}\n\n", e));
            }
        }

        self.commit(&delta)
    }
}
