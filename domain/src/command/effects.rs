//! State transitions of the commands and of the vote tally.
//!
//! Each function reads the committed state and returns the delta to
//! commit. Rejections are reported to the acting agent as `[ERROR]` lines
//! inside the delta, never as `Err`; [`Effect::accepted`] tells the two
//! apart.

use crate::quorum::{Proposal, Tally};
use crate::session::{SessionDelta, SessionState};
use std::fmt::Display;

pub const GRAPH_REBUILT_NOTICE: &str = "[NOTIFICATION] Knowledge graph has been rebuilt.\n\n";
pub const JOB_FINISHED_NOTICE: &str = "[NOTIFICATION] Experiments have finished running.\n\n";

/// Line shown to an agent whose command failed validation
pub fn command_error_line(error: impl Display) -> String {
    format!("[ERROR] Error occured when executing command: {}\n\n", error)
}

/// Outcome of running one command
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    pub delta: SessionDelta,
    /// `false` when the command was refused and only an error was reported
    pub accepted: bool,
}

impl Effect {
    pub fn accepted(delta: SessionDelta) -> Self {
        Self {
            delta,
            accepted: true,
        }
    }
}

/// Report an error to the acting agent and change nothing else
pub fn reject(state: &SessionState, message: impl Into<String>) -> Effect {
    let mut delta = SessionDelta::new();
    delta.personal_output(state.acting_agent(), message);
    Effect {
        delta,
        accepted: false,
    }
}

pub fn propose(state: &SessionState, code: &str) -> Effect {
    if state.job_running() {
        return reject(
            state,
            "[ERROR] Cannot propose while experiments are already running.\n\n",
        );
    }
    if state.proposal().is_some() {
        return reject(state, "[ERROR] Cannot propose while voting is in session.\n\n");
    }

    let agent = state.acting_agent();
    let order = state.agent_order();
    let mut delta = SessionDelta::new();
    delta
        .open_proposal(Proposal::open(code, agent.clone()))
        .fan_out_global(
            order,
            agent,
            &format!(
                "[PROPOSAL] {} has proposed a generation script. Voting is now in session.\n",
                agent
            ),
            true,
        )
        .fan_out_global(order, agent, &format!("{}\n\n", code), false);
    Effect::accepted(delta)
}

pub fn vote(state: &SessionState) -> Effect {
    let agent = state.acting_agent();
    let Some(proposal) = state.proposal() else {
        return reject(state, "[ERROR] Voting is not in session.\n\n");
    };
    if proposal.has_voted(agent) {
        return reject(state, "[ERROR] You have already voted.\n\n");
    }

    let mut delta = SessionDelta::new();
    delta.add_vote(agent).fan_out_global(
        state.agent_order(),
        agent,
        &format!("[VOTE] {} has voted in favor of the proposal.\n\n", agent),
        true,
    );
    Effect::accepted(delta)
}

pub fn message(state: &SessionState, content: &str) -> Effect {
    let agent = state.acting_agent();
    let mut delta = SessionDelta::new();
    delta.fan_out_global(
        state.agent_order(),
        agent,
        &format!("[{}] {}\n\n", agent, content),
        false,
    );
    Effect::accepted(delta)
}

pub fn traversal_result(state: &SessionState, formatted: &str) -> Effect {
    let mut delta = SessionDelta::new();
    delta.personal_output(state.acting_agent(), format!("[TRAVERSAL]\n{}", formatted));
    Effect::accepted(delta)
}

pub fn example_result(state: &SessionState, example: &str) -> Effect {
    let mut delta = SessionDelta::new();
    delta.personal_output(state.acting_agent(), format!("[EXAMPLE]\n\n{}\n\n", example));
    Effect::accepted(delta)
}

pub fn node_not_found(state: &SessionState, node_id: impl Display) -> Effect {
    reject(state, format!("[ERROR] Node {} not found.\n\n", node_id))
}

/// Close the active vote.
///
/// The tally is broadcast to every agent. `dispatch_error` is appended
/// when the generation side effect of a passed vote failed; it does not
/// change the outcome, and a passed vote always marks the job as running.
pub fn close_vote(state: &SessionState, tally: &Tally, dispatch_error: Option<&str>) -> SessionDelta {
    let mut text = tally.count_line();
    text.push_str(tally.verdict_line());
    if let Some(error) = dispatch_error {
        text.push_str(&format!(
            "[ERROR] Error occured when executing script: {}.\n\n",
            error
        ));
    }

    let agent = state.acting_agent();
    let mut delta = SessionDelta::new();
    delta
        .fan_out_global(state.agent_order(), agent, &text, true)
        .close_proposal();
    if tally.passed {
        delta.set_job_running(true);
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::value_objects::AgentId;
    use crate::memory::MemoryMessage;
    use crate::quorum::QuorumRule;

    const CODE: &str = "```python\ndef generate_experiments():\n    return []\n```";

    fn ids() -> Vec<AgentId> {
        ["A", "B", "C", "D"].iter().map(|s| AgentId::new(*s)).collect()
    }

    fn state() -> SessionState {
        SessionState::new(ids(), |_| String::new()).unwrap()
    }

    fn global(state: &SessionState, id: &str) -> String {
        match state.memory(&AgentId::new(id)).last() {
            Some(MemoryMessage::User { global_output, .. }) => global_output.clone(),
            _ => String::new(),
        }
    }

    fn personal(state: &SessionState, id: &str) -> String {
        match state.memory(&AgentId::new(id)).last() {
            Some(MemoryMessage::User { personal_output, .. }) => personal_output.clone(),
            _ => String::new(),
        }
    }

    #[test]
    fn test_propose_broadcasts_and_opens_vote() {
        let s = state();
        let next = s.apply(&propose(&s, CODE).delta).unwrap();

        let proposal = next.proposal().unwrap();
        assert_eq!(proposal.proposer(), &AgentId::new("A"));
        assert_eq!(proposal.vote_count(), 1);

        let notice = "[PROPOSAL] A has proposed a generation script. Voting is now in session.\n";
        assert_eq!(global(&next, "A"), notice);
        assert_eq!(global(&next, "B"), format!("{}{}\n\n", notice, CODE));
    }

    #[test]
    fn test_propose_rejected_while_job_running() {
        let mut running = SessionDelta::new();
        running.set_job_running(true);
        let s = state().apply(&running).unwrap();

        let next = s.apply(&propose(&s, CODE).delta).unwrap();
        assert!(next.proposal().is_none());
        assert!(personal(&next, "A").ends_with(
            "[ERROR] Cannot propose while experiments are already running.\n\n"
        ));
    }

    #[test]
    fn test_propose_rejected_while_voting() {
        let s = state();
        let s = s.apply(&propose(&s, CODE).delta).unwrap();
        let next = s.apply(&propose(&s, CODE).delta).unwrap();
        assert!(personal(&next, "A").ends_with("[ERROR] Cannot propose while voting is in session.\n\n"));
    }

    #[test]
    fn test_double_vote_rejected() {
        let s = state();
        let s = s.apply(&propose(&s, CODE).delta).unwrap();
        let effect = vote(&s);
        assert!(!effect.accepted);
        let next = s.apply(&effect.delta).unwrap();

        assert_eq!(next.proposal().unwrap().vote_count(), 1);
        assert!(personal(&next, "A").ends_with("[ERROR] You have already voted.\n\n"));
    }

    #[test]
    fn test_vote_without_proposal() {
        let s = state();
        let next = s.apply(&vote(&s).delta).unwrap();
        assert!(personal(&next, "A").ends_with("[ERROR] Voting is not in session.\n\n"));
    }

    #[test]
    fn test_message_goes_to_others_only() {
        let s = state();
        let next = s.apply(&message(&s, "hello").delta).unwrap();
        assert_eq!(global(&next, "A"), "");
        assert_eq!(global(&next, "C"), "[A] hello\n\n");
    }

    #[test]
    fn test_close_vote_reports_dispatch_error_but_passes() {
        let s = state();
        let s = s.apply(&propose(&s, CODE).delta).unwrap();
        let tally = Tally {
            votes: 3,
            n_agents: 4,
            passed: QuorumRule::Majority.is_satisfied(3, 4),
        };

        let next = s.apply(&close_vote(&s, &tally, Some("boom"))).unwrap();
        assert!(next.proposal().is_none());
        assert!(next.job_running());
        assert!(global(&next, "D").ends_with(
            "[VOTE] 3/4 agents have voted in favor of the proposal.\n\
             [VOTE] Vote has passed. Executing experiment generation script.\n\n\
             [ERROR] Error occured when executing script: boom.\n\n"
        ));
    }

    #[test]
    fn test_close_failed_vote_keeps_job_idle() {
        let s = state();
        let s = s.apply(&propose(&s, CODE).delta).unwrap();
        let tally = s.proposal().unwrap().tally(4, QuorumRule::Majority);

        let next = s.apply(&close_vote(&s, &tally, None)).unwrap();
        assert!(!next.job_running());
        assert!(global(&next, "B").ends_with("[VOTE] Vote has not passed.\n\n"));
    }
}
