//! Run Turn use case
//!
//! Executes one agent turn as a fixed sequence of stages:
//!
//! ```text
//! StartTurn ─▶ Reason ─▶ Plan ─▶ Summarize ─▶ Commands ─▶ EndTurn
//! ```
//!
//! Every stage reads the committed [`SessionState`], builds a
//! [`SessionDelta`](agora_domain::SessionDelta) and commits it before the
//! next stage starts. Agent mistakes and failed external calls become
//! `[ERROR]` lines in the acting agent's memory; only a delta that does not
//! apply to the state ends the turn with an error.
//!
//! # Module Structure
//!
//! - `types` - turn report, ports bundle and error type
//! - `start_turn` - background notifications, queue reset, assistant slot
//! - `reason` - the reasoning call that produces the command queue
//! - `plan` - cadence-gated replanning
//! - `summarize` - memory eviction into the running summary
//! - `commands` - command execution
//! - `end_turn` - cursor advance and vote tally

mod commands;
mod end_turn;
mod plan;
mod reason;
mod start_turn;
mod summarize;
mod types;

pub use types::{CommandOutcome, Notification, PlanOutcome, RunTurnError, TurnPorts, TurnReport};

use crate::config::EngineConfig;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger, events,
};
use crate::ports::llm_gateway::{Completion, CompletionRequest, GatewayError};
use crate::ports::progress::{TurnProgressNotifier, TurnStage};
use crate::use_cases::shared::call_with_retry;
use agora_domain::{AgentPromptTemplate, DomainError, SessionDelta, SessionState};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

/// Drives turns over an owned [`SessionState`].
pub struct TurnEngine {
    config: EngineConfig,
    ports: TurnPorts,
    logger: Arc<dyn ConversationLogger>,
    rng: StdRng,
    state: SessionState,
}

impl TurnEngine {
    /// Create an engine over an existing state.
    ///
    /// The state's agent order must match the configured roster exactly;
    /// a session is never silently re-shaped.
    pub fn new(
        config: EngineConfig,
        ports: TurnPorts,
        state: SessionState,
    ) -> Result<Self, RunTurnError> {
        state.validate()?;
        let order = config.roster.order();
        if state.agent_order() != order.as_slice() {
            return Err(RunTurnError::RosterMismatch(format!(
                "session has [{}], configuration has [{}]",
                join_ids(state.agent_order()),
                join_ids(&order)
            )));
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            ports,
            logger: Arc::new(NoConversationLogger),
            rng,
            state,
        })
    }

    /// Fresh session state for the configured roster
    pub fn initial_state(config: &EngineConfig) -> Result<SessionState, DomainError> {
        let order = config.roster.order();
        SessionState::new(order.clone(), |agent| {
            AgentPromptTemplate::system_prompt(&order, agent, &config.objective, "", "")
        })
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn into_state(self) -> SessionState {
        self.state
    }

    /// Run the acting agent's turn to completion.
    pub async fn run_turn(
        &mut self,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<TurnReport, RunTurnError> {
        let agent = self.state.acting_agent().clone();
        let profile = self
            .config
            .roster
            .profile(&agent)
            .cloned()
            .ok_or_else(|| RunTurnError::RosterMismatch(format!("no profile for {}", agent)))?;
        let cursor = self.state.cursor();
        let mut report = TurnReport::new(agent.clone(), cursor);

        info!(
            "Round {}, turn {}: {}",
            cursor.n_rounds + 1,
            cursor.turn + 1,
            agent
        );
        progress.on_turn_start(&agent, cursor);
        self.log(
            events::TURN_STARTED,
            json!({ "agent": agent, "round": cursor.n_rounds, "turn": cursor.turn }),
        );

        progress.on_stage(&agent, TurnStage::StartTurn);
        self.start_turn(&agent, &mut report).await?;

        progress.on_stage(&agent, TurnStage::Reason);
        self.reason(&agent, &profile, &mut report).await?;

        if profile.plan_frequency.is_some() {
            progress.on_stage(&agent, TurnStage::Plan);
            self.plan(&agent, &profile, &mut report).await?;
        }

        progress.on_stage(&agent, TurnStage::Summarize);
        self.summarize(&agent, &profile, &mut report).await?;

        progress.on_stage(&agent, TurnStage::Commands);
        self.drain_commands(&agent, progress, &mut report).await?;

        progress.on_stage(&agent, TurnStage::EndTurn);
        self.end_turn(progress, &mut report).await?;

        progress.on_turn_end(&report);
        self.log(
            events::TURN_ENDED,
            json!({
                "agent": agent,
                "commands": report.commands.len(),
                "rejected": report.rejected_commands(),
                "next": self.state.acting_agent(),
            }),
        );
        Ok(report)
    }

    fn commit(&mut self, delta: &SessionDelta) -> Result<(), RunTurnError> {
        self.state = self.state.apply(delta)?;
        Ok(())
    }

    fn log(&self, event_type: &'static str, payload: Value) {
        self.logger.log(ConversationEvent::new(event_type, payload));
    }

    async fn complete(
        &self,
        operation: &str,
        request: &CompletionRequest,
    ) -> Result<Completion, GatewayError> {
        let gateway = self.ports.gateway.as_ref();
        call_with_retry(
            operation,
            &self.config.retry,
            self.config.call_timeout,
            move || gateway.complete(request),
        )
        .await
    }
}

fn join_ids(ids: &[agora_domain::AgentId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
