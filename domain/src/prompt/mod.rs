//! Prompt domain
//!
//! Templates for the agent system prompt, the planner and the summarizer.

mod template;

pub use template::{AgentPromptTemplate, PLAN_INCOMPLETE};
