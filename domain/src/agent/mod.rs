//! Agent domain - who takes part in the session and how each agent is bounded.
//!
//! - [`value_objects::AgentId`] - agent identity, unique within the roster
//! - [`profile::AgentProfile`] - models, planning cadence and memory policy
//! - [`roster::AgentRoster`] - validated turn order
//! - [`validation`] - non-fatal configuration issues

pub mod profile;
pub mod roster;
pub mod validation;
pub mod value_objects;
