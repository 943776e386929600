//! Propose/vote consensus
//!
//! At most one proposal is active at a time. It is opened by a `propose`
//! command (the proposer votes yes implicitly), grows through `vote`
//! commands, and is closed by a tally when the turn cursor comes back
//! around to the proposer. Late votes before that point count; nothing
//! after it does.
//!
//! ```text
//!   propose (A)        vote (B)        vote (C)       cursor -> A
//!  ────────────▶ {A} ──────────▶ {A,B} ──────────▶ {A,B,C} ──────▶ tally
//! ```

pub mod proposal;
pub mod rule;

pub use proposal::{Proposal, Tally};
pub use rule::QuorumRule;
