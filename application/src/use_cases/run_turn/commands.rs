//! Command stage: drain the queue, one committed delta per command.

use super::TurnEngine;
use super::types::{CommandOutcome, RunTurnError, TurnReport};
use crate::ports::conversation_logger::events;
use crate::ports::knowledge_graph::GraphError;
use crate::ports::progress::TurnProgressNotifier;
use crate::use_cases::shared::call_with_retry;
use agora_domain::command::effects::{self, Effect};
use agora_domain::{AgentId, Command, NodeId, QueuedCommand, SessionDelta, StartNode, TraversalAlgorithm};
use rand::seq::SliceRandom;
use serde_json::json;
use tracing::{debug, warn};

impl TurnEngine {
    /// Execute queued commands in the order the agent issued them.
    ///
    /// Each command is popped and its effect committed before the next is
    /// read, so a `vote` after a `propose` in the same output sees the open
    /// proposal.
    pub(super) async fn drain_commands(
        &mut self,
        agent: &AgentId,
        progress: &dyn TurnProgressNotifier,
        report: &mut TurnReport,
    ) -> Result<(), RunTurnError> {
        while let Some(queued) = self.state.command_queue().front().cloned() {
            let effect = self.execute_command(&queued).await;
            debug!(
                "{} ran '{}' ({})",
                agent,
                queued.name,
                if effect.accepted { "ok" } else { "rejected" }
            );

            let mut delta = SessionDelta::new();
            delta.pop_command().extend(effect.delta);
            self.commit(&delta)?;

            progress.on_command(agent, &queued.name, effect.accepted);
            self.log(
                events::COMMAND_EXECUTED,
                json!({
                    "agent": agent,
                    "command": queued.name,
                    "params": queued.params,
                    "accepted": effect.accepted,
                }),
            );
            report.commands.push(CommandOutcome {
                name: queued.name,
                accepted: effect.accepted,
            });
        }
        Ok(())
    }

    async fn execute_command(&mut self, queued: &QueuedCommand) -> Effect {
        let command = match Command::try_from(queued) {
            Ok(command) => command,
            Err(e) => return effects::reject(&self.state, effects::command_error_line(e)),
        };

        match command {
            Command::Propose { code } => effects::propose(&self.state, &code),
            Command::Vote => effects::vote(&self.state),
            Command::Message { content } => effects::message(&self.state, &content),
            Command::Traverse {
                start,
                algorithm,
                max_count,
            } => self.traverse(start, algorithm, max_count).await,
            Command::Example { node_id } => self.example(node_id).await,
        }
    }

    async fn traverse(
        &mut self,
        start: StartNode,
        algorithm: TraversalAlgorithm,
        max_count: usize,
    ) -> Effect {
        let start = match start {
            StartNode::Id(id) => id,
            StartNode::Random => match self.random_node().await {
                Ok(Some(id)) => id,
                Ok(None) => return effects::reject(&self.state, "[ERROR] Knowledge graph is empty.\n\n"),
                Err(e) => return self.graph_failure(e),
            },
        };

        let graph = self.ports.graph.as_ref();
        let result = call_with_retry(
            "graph traversal",
            &self.config.retry,
            self.config.call_timeout,
            move || graph.traverse(start, algorithm, max_count),
        )
        .await;

        match result {
            Ok(Some(traversal)) => effects::traversal_result(&self.state, &traversal.render()),
            Ok(None) => effects::node_not_found(&self.state, start),
            Err(e) => self.graph_failure(e),
        }
    }

    async fn example(&mut self, node_id: i64) -> Effect {
        // Node ids are positive; the agent-facing error still echoes the
        // id it asked for.
        let Ok(node) = NodeId::try_from(node_id) else {
            return effects::node_not_found(&self.state, node_id);
        };
        if node == 0 {
            return effects::node_not_found(&self.state, node_id);
        }

        let graph = self.ports.graph.as_ref();
        let ids = call_with_retry(
            "example lookup",
            &self.config.retry,
            self.config.call_timeout,
            move || graph.example_ids(node),
        )
        .await;

        let ids = match ids {
            Ok(Some(ids)) => ids,
            Ok(None) => return effects::node_not_found(&self.state, node_id),
            Err(e) => return self.graph_failure(e),
        };
        let Some(&example_id) = ids.choose(&mut self.rng) else {
            return effects::reject(
                &self.state,
                format!("[ERROR] Node {} has no examples.\n\n", node_id),
            );
        };

        let graph = self.ports.graph.as_ref();
        let example = call_with_retry(
            "example lookup",
            &self.config.retry,
            self.config.call_timeout,
            move || graph.lookup_example(example_id),
        )
        .await;

        match example {
            Ok(Some(text)) => effects::example_result(&self.state, &text),
            Ok(None) => effects::reject(&self.state, "[ERROR] Could not find example.\n\n"),
            Err(e) => self.graph_failure(e),
        }
    }

    async fn random_node(&mut self) -> Result<Option<NodeId>, GraphError> {
        let graph = self.ports.graph.as_ref();
        let ids = call_with_retry(
            "graph node listing",
            &self.config.retry,
            self.config.call_timeout,
            move || graph.node_ids(),
        )
        .await?;
        Ok(ids.choose(&mut self.rng).copied())
    }

    fn graph_failure(&self, error: GraphError) -> Effect {
        warn!("Knowledge graph query failed: {}", error);
        effects::reject(
            &self.state,
            format!("[ERROR] Knowledge graph query failed: {}\n\n", error),
        )
    }
}
