//! Session state and its update rules.
//!
//! - [`state::SessionState`]: memory, text state, command queue, proposal,
//!   job flag and turn cursor for the whole session
//! - [`delta::SessionDelta`]: staged changes, committed with
//!   [`SessionState::apply`]

pub mod delta;
pub mod state;

pub use delta::{AgentUpdate, MemoryOp, ProposalChange, QueueChange, SessionDelta};
pub use state::{AgentRecord, INITIAL_MESSAGE, SessionState, TurnCursor};
