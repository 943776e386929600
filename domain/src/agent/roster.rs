//! The fixed, ordered set of agents in a session.

use super::profile::AgentProfile;
use super::value_objects::AgentId;
use crate::core::error::DomainError;
use std::collections::HashSet;

/// Validated, ordered list of agent profiles.
///
/// The order is the round-robin turn order. Construction rejects empty
/// rosters, blank or duplicate ids and invalid memory policies, so a
/// roster that exists is always runnable.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentRoster {
    profiles: Vec<AgentProfile>,
}

impl AgentRoster {
    pub fn new(profiles: Vec<AgentProfile>) -> Result<Self, DomainError> {
        if profiles.is_empty() {
            return Err(DomainError::NoAgents);
        }

        let mut seen = HashSet::new();
        for profile in &profiles {
            profile.validate()?;
            if !seen.insert(profile.id.as_str()) {
                return Err(DomainError::DuplicateAgent(profile.id.to_string()));
            }
        }

        Ok(Self { profiles })
    }

    /// Turn order
    pub fn order(&self) -> Vec<AgentId> {
        self.profiles.iter().map(|p| p.id.clone()).collect()
    }

    pub fn profile(&self, id: &AgentId) -> Option<&AgentProfile> {
        self.profiles.iter().find(|p| &p.id == id)
    }

    pub fn profiles(&self) -> &[AgentProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_preserves_order() {
        let roster = AgentRoster::new(vec![
            AgentProfile::new("B"),
            AgentProfile::new("A"),
            AgentProfile::new("C"),
        ])
        .unwrap();
        let order: Vec<String> = roster.order().iter().map(|a| a.to_string()).collect();
        assert_eq!(order, vec!["B", "A", "C"]);
        assert!(roster.profile(&AgentId::new("A")).is_some());
        assert!(roster.profile(&AgentId::new("Z")).is_none());
    }

    #[test]
    fn test_roster_rejects_duplicates() {
        let result = AgentRoster::new(vec![AgentProfile::new("A"), AgentProfile::new("A")]);
        assert_eq!(result, Err(DomainError::DuplicateAgent("A".to_string())));
    }

    #[test]
    fn test_roster_rejects_empty() {
        assert_eq!(AgentRoster::new(vec![]), Err(DomainError::NoAgents));
    }
}
