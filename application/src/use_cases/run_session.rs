//! Run Session use case
//!
//! Loads (or creates) the session state, then runs turns until a round
//! limit, a turn budget or an external halt stops it. The state is saved
//! after every turn, so a stopped session resumes exactly where it left
//! off.

use crate::config::EngineConfig;
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::progress::TurnProgressNotifier;
use crate::ports::session_store::{SessionStore, StoreError};
use crate::use_cases::run_turn::{RunTurnError, TurnEngine, TurnPorts};
use crate::use_cases::shared::is_cancelled;
use agora_domain::{DomainError, SessionState, TurnCursor};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum RunSessionError {
    #[error(transparent)]
    Turn(#[from] RunTurnError),

    #[error("Failed to persist session: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to build initial session: {0}")]
    Init(#[from] DomainError),
}

/// Limits for one invocation
#[derive(Debug, Clone, Default)]
pub struct RunSessionInput {
    /// Stop once the session has completed this many rounds in total
    pub max_rounds: Option<u64>,
    /// Stop after this many turns in this invocation
    pub turn_budget: Option<usize>,
    /// Ignore persisted state and start over
    pub fresh: bool,
}

impl RunSessionInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_rounds(mut self, rounds: u64) -> Self {
        self.max_rounds = Some(rounds);
        self
    }

    pub fn with_turn_budget(mut self, turns: usize) -> Self {
        self.turn_budget = Some(turns);
        self
    }

    pub fn fresh(mut self) -> Self {
        self.fresh = true;
        self
    }
}

/// Why the session loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    RoundLimit,
    TurnBudget,
    Cancelled,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::RoundLimit => write!(f, "round limit reached"),
            StopReason::TurnBudget => write!(f, "turn budget spent"),
            StopReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub turns_run: usize,
    pub cursor: TurnCursor,
    pub stop_reason: StopReason,
    /// Whether the run continued a persisted session
    pub resumed: bool,
    pub job_running: bool,
}

pub struct RunSessionUseCase {
    config: EngineConfig,
    ports: TurnPorts,
    store: Arc<dyn SessionStore>,
    logger: Arc<dyn ConversationLogger>,
    cancellation: Option<CancellationToken>,
}

impl RunSessionUseCase {
    pub fn new(config: EngineConfig, ports: TurnPorts, store: Arc<dyn SessionStore>) -> Self {
        Self {
            config,
            ports,
            store,
            logger: Arc::new(NoConversationLogger),
            cancellation: None,
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Set a token checked between turns
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// The persisted state, or a new one. The flag is `true` when resumed.
    pub async fn load_or_init(&self, fresh: bool) -> Result<(SessionState, bool), RunSessionError> {
        if !fresh {
            if let Some(state) = self.store.load().await? {
                info!(
                    "Resuming session at round {}, turn {}",
                    state.cursor().n_rounds + 1,
                    state.cursor().turn + 1
                );
                return Ok((state, true));
            }
        }
        info!("Starting a new session with {} agents", self.config.roster.len());
        Ok((TurnEngine::initial_state(&self.config)?, false))
    }

    pub async fn execute(
        &self,
        input: RunSessionInput,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<SessionReport, RunSessionError> {
        let (state, resumed) = self.load_or_init(input.fresh).await?;
        if !resumed {
            self.store.save(&state).await?;
        }

        let mut engine = TurnEngine::new(self.config.clone(), self.ports.clone(), state)?
            .with_conversation_logger(self.logger.clone());
        let mut turns_run = 0;

        let stop_reason = loop {
            if input
                .max_rounds
                .is_some_and(|max| engine.state().cursor().n_rounds >= max)
            {
                break StopReason::RoundLimit;
            }
            if input.turn_budget.is_some_and(|budget| turns_run >= budget) {
                break StopReason::TurnBudget;
            }
            if is_cancelled(&self.cancellation) {
                info!("Halt requested, stopping at turn boundary");
                break StopReason::Cancelled;
            }

            engine.run_turn(progress).await?;
            turns_run += 1;

            self.store.save(engine.state()).await?;
            debug!("Session saved after turn {}", turns_run);
        };

        let state = engine.state();
        info!("Session stopped ({}) after {} turn(s)", stop_reason, turns_run);
        Ok(SessionReport {
            turns_run,
            cursor: state.cursor(),
            stop_reason,
            resumed,
            job_running: state.job_running(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use crate::ports::knowledge_graph::{GraphError, KnowledgeGraphPort, NoRebuildSignal, Traversal};
    use crate::ports::llm_gateway::{Completion, CompletionRequest, GatewayError, LlmGateway};
    use crate::ports::progress::NoProgress;
    use crate::ports::script_runner::{ScriptError, ScriptRunner};
    use crate::ports::work_queue::{QueueError, WorkQueue};
    use agora_domain::{AgentProfile, AgentRoster, NodeId, TraversalAlgorithm};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers every call with a greeting and cancels after `cancel_after`
    /// calls when a token is attached.
    struct GreetingGateway {
        calls: AtomicUsize,
        cancel: Option<(usize, CancellationToken)>,
    }

    #[async_trait]
    impl LlmGateway for GreetingGateway {
        async fn complete(&self, request: &CompletionRequest) -> Result<Completion, GatewayError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some((after, token)) = &self.cancel {
                if n >= *after {
                    token.cancel();
                }
            }
            let content = serde_json::json!({
                "commands": [{"command": "message", "content": format!("hi from {}", request.agent)}]
            });
            Ok(Completion {
                model: "mock".to_string(),
                content: content.to_string(),
            })
        }
    }

    struct EmptyGraph;

    #[async_trait]
    impl KnowledgeGraphPort for EmptyGraph {
        async fn node_ids(&self) -> Result<Vec<NodeId>, GraphError> {
            Ok(Vec::new())
        }

        async fn traverse(
            &self,
            _start: NodeId,
            _algorithm: TraversalAlgorithm,
            _max_count: usize,
        ) -> Result<Option<Traversal>, GraphError> {
            Ok(None)
        }

        async fn example_ids(&self, _node: NodeId) -> Result<Option<Vec<u64>>, GraphError> {
            Ok(None)
        }

        async fn lookup_example(&self, _example_id: u64) -> Result<Option<String>, GraphError> {
            Ok(None)
        }
    }

    struct IdleQueue;

    #[async_trait]
    impl WorkQueue for IdleQueue {
        fn name(&self) -> &str {
            "idle"
        }

        async fn depth(&self) -> Result<usize, QueueError> {
            Ok(0)
        }

        async fn push(&self, items: Vec<Value>) -> Result<usize, QueueError> {
            Ok(items.len())
        }
    }

    struct NoScripts;

    #[async_trait]
    impl ScriptRunner for NoScripts {
        async fn execute(&self, _script: &str) -> Result<Vec<Value>, ScriptError> {
            Err(ScriptError::Disabled)
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        state: Mutex<Option<SessionState>>,
        saves: AtomicUsize,
    }

    #[async_trait]
    impl SessionStore for MemoryStore {
        async fn load(&self) -> Result<Option<SessionState>, StoreError> {
            Ok(self.state.lock().unwrap().clone())
        }

        async fn save(&self, state: &SessionState) -> Result<(), StoreError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            *self.state.lock().unwrap() = Some(state.clone());
            Ok(())
        }
    }

    fn use_case(
        store: Arc<MemoryStore>,
        cancel: Option<(usize, CancellationToken)>,
    ) -> RunSessionUseCase {
        let roster = AgentRoster::new(vec![
            AgentProfile::new("Agent 1"),
            AgentProfile::new("Agent 2"),
            AgentProfile::new("Agent 3"),
        ])
        .unwrap();
        let config = EngineConfig::new(roster)
            .with_retry(RetryPolicy::none())
            .with_seed(1);
        let ports = TurnPorts {
            gateway: Arc::new(GreetingGateway {
                calls: AtomicUsize::new(0),
                cancel: cancel.clone(),
            }),
            graph: Arc::new(EmptyGraph),
            rebuild: Arc::new(NoRebuildSignal),
            queue: Arc::new(IdleQueue),
            scripts: Arc::new(NoScripts),
        };
        let use_case = RunSessionUseCase::new(config, ports, store);
        match cancel {
            Some((_, token)) => use_case.with_cancellation(token),
            None => use_case,
        }
    }

    #[tokio::test]
    async fn test_runs_until_round_limit_and_saves_each_turn() {
        let store = Arc::new(MemoryStore::default());
        let report = use_case(store.clone(), None)
            .execute(RunSessionInput::new().with_max_rounds(2), &NoProgress)
            .await
            .unwrap();

        assert_eq!(report.stop_reason, StopReason::RoundLimit);
        assert_eq!(report.turns_run, 6);
        assert_eq!(report.cursor, TurnCursor { turn: 0, n_rounds: 2 });
        assert!(!report.resumed);
        // initial save plus one per turn
        assert_eq!(store.saves.load(Ordering::SeqCst), 7);
    }

    #[tokio::test]
    async fn test_resumes_persisted_session() {
        let store = Arc::new(MemoryStore::default());
        let first = use_case(store.clone(), None)
            .execute(RunSessionInput::new().with_turn_budget(2), &NoProgress)
            .await
            .unwrap();
        assert_eq!(first.stop_reason, StopReason::TurnBudget);
        assert_eq!(first.cursor.turn, 2);

        let saved = store.state.lock().unwrap().clone().unwrap();
        let second = use_case(store.clone(), None)
            .execute(RunSessionInput::new().with_turn_budget(1), &NoProgress)
            .await
            .unwrap();

        assert!(second.resumed);
        assert_eq!(second.cursor, TurnCursor { turn: 0, n_rounds: 1 });
        // the resumed turn belongs to the agent that was next when saved
        assert_eq!(saved.acting_agent().as_str(), "Agent 3");
    }

    #[tokio::test]
    async fn test_fresh_ignores_persisted_session() {
        let store = Arc::new(MemoryStore::default());
        use_case(store.clone(), None)
            .execute(RunSessionInput::new().with_turn_budget(2), &NoProgress)
            .await
            .unwrap();

        let report = use_case(store.clone(), None)
            .execute(RunSessionInput::new().with_turn_budget(1).fresh(), &NoProgress)
            .await
            .unwrap();

        assert!(!report.resumed);
        assert_eq!(report.cursor, TurnCursor { turn: 1, n_rounds: 0 });
    }

    #[tokio::test]
    async fn test_cancellation_stops_at_turn_boundary() {
        let store = Arc::new(MemoryStore::default());
        let token = CancellationToken::new();

        let report = use_case(store.clone(), Some((2, token)))
            .execute(RunSessionInput::new(), &NoProgress)
            .await
            .unwrap();

        // cancelled during the second turn, which still completes
        assert_eq!(report.stop_reason, StopReason::Cancelled);
        assert_eq!(report.turns_run, 2);
        let saved = store.state.lock().unwrap().clone().unwrap();
        assert_eq!(saved.cursor().turn, 2);
        assert!(saved.command_queue().is_empty());
    }

    #[tokio::test]
    async fn test_mismatched_roster_is_an_error() {
        let store = Arc::new(MemoryStore::default());
        let other = SessionState::new(
            vec!["Solo".into()],
            |_| String::new(),
        )
        .unwrap();
        store.save(&other).await.unwrap();

        let result = use_case(store, None)
            .execute(RunSessionInput::new().with_turn_budget(1), &NoProgress)
            .await;

        assert!(matches!(
            result,
            Err(RunSessionError::Turn(RunTurnError::RosterMismatch(_)))
        ));
    }
}
