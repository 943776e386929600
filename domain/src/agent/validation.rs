//! Non-fatal configuration issues.
//!
//! Fatal problems (duplicate agents, impossible memory bounds) are
//! [`DomainError`](crate::DomainError)s raised while building the roster.
//! Everything here still runs, but probably not the way the operator
//! intended, so it is reported as a warning at startup.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// An agent has no models and there are no default models either.
    NoModels { agent: String },
    /// Both an eviction count and a fraction were given; the count wins.
    ConflictingEviction { agent: String },
    /// Passed proposals cannot run because no script interpreter is set.
    GenerationDisabled,
    /// The API key environment variable is not set.
    MissingApiKey { variable: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }
}
