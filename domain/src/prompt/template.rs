//! Prompt templates for agents, the planner and the summarizer

use crate::agent::value_objects::AgentId;

/// Planner reply meaning "keep the current plan and ask again next turn"
pub const PLAN_INCOMPLETE: &str = "PLAN_INCOMPLETE";

/// Templates for the three kinds of reasoning calls
pub struct AgentPromptTemplate;

impl AgentPromptTemplate {
    /// Command reference shown to every agent
    pub fn command_reference() -> &'static str {
        r#"## Commands

Reply with a single JSON object of the form:

{"commands": [{"command": "<name>", ...parameters}]}

Commands run in the order given. Available commands:

- **message** `{"command": "message", "content": "<text>"}`
  Send a message to every other agent.

- **propose** `{"command": "propose", "code": "```python\n...\n```"}`
  Propose an experiment generation script. The code must start with
  ```python, end with ```, and define `def generate_experiments():`
  returning a list of JSON-serializable experiment records. Voting opens
  immediately and you vote in favor automatically. Not allowed while a
  vote is in session or experiments are running.

- **vote** `{"command": "vote"}`
  Vote in favor of the current proposal. The vote closes when the turn
  comes back to the proposer; it passes with a strict majority of all
  agents.

- **traverse** `{"command": "traverse", "node_id": <id>, "algorithm": "bfs" | "dfs", "max_count": 1-10}`
  Walk the knowledge graph from a node. A negative id starts at a random
  node.

- **example** `{"command": "example", "node_id": <id>}`
  Show one random experiment supporting a node."#
    }

    /// System prompt for an agent's Reason call
    pub fn system_prompt(
        order: &[AgentId],
        agent: &AgentId,
        objective: &str,
        plan: &str,
        summary: &str,
    ) -> String {
        let others = order
            .iter()
            .filter(|id| *id != agent)
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"You are {agent}, one of several research agents working together in a shared session.
The other agents are: {others}.

## Objective

{objective}

Agents take turns. On your turn you see your personal output (results of
your own commands) and the global output (messages and notices from the
other agents) since your last turn.

{commands}

## Your Plan

{plan}

## Summary Of Earlier Interaction

{summary}"#,
            agent = agent,
            others = if others.is_empty() { "none" } else { &others },
            objective = objective,
            commands = Self::command_reference(),
            plan = if plan.is_empty() { "No plan yet." } else { plan },
            summary = if summary.is_empty() { "Nothing yet." } else { summary },
        )
    }

    /// Prompt for the Plan stage
    pub fn planner_prompt(
        agent: &AgentId,
        objective: &str,
        interaction: &str,
        plan: &str,
        summary: &str,
    ) -> String {
        format!(
            r#"You are the planner for {agent}, a research agent in a multi-agent session.

## Objective

{objective}

## Current Plan

{plan}

## Summary Of Earlier Interaction

{summary}

## Recent Interaction

{interaction}

## Your Directive

Write an updated plan for {agent}: the goals to pursue over the next few
turns and the commands likely to reach them. Reply with the plan text
only. If there is not yet enough information to improve the current
plan, reply with {sentinel} and nothing else."#,
            agent = agent,
            objective = objective,
            plan = if plan.is_empty() { "No plan yet." } else { plan },
            summary = if summary.is_empty() { "Nothing yet." } else { summary },
            interaction = interaction,
            sentinel = PLAN_INCOMPLETE,
        )
    }

    /// Prompt for the Summarize stage
    pub fn summary_prompt(summary: &str, interaction: &str) -> String {
        format!(
            r#"** Current summary: **

{summary}

** Guidelines **
- Focus on key information and important events.
- Outline all reasoning for decisions made.
- Include any unresolved questions or tasks.

** Your Directive **

Along with the current summary, summarize the following interaction between multiple AI agents:

{interaction}"#
        )
    }

    /// Whether a planner reply asks to keep the old plan
    pub fn is_plan_incomplete(reply: &str) -> bool {
        reply.contains(PLAN_INCOMPLETE)
    }
}
