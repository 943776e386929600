//! Reasoning gateway port
//!
//! Defines the interface for the text-completion service that drives the
//! agents, the planner and the summarizer.

use agora_domain::{AgentId, ChatMessage};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during gateway operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

impl GatewayError {
    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::ConnectionError(_)
                | GatewayError::RateLimited(_)
                | GatewayError::ServerError(_)
                | GatewayError::Timeout(_)
        )
    }
}

/// Output mode requested from the completion service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// A single JSON object (Reason stage)
    Json,
    /// Free text (Plan and Summarize stages)
    Text,
}

/// One completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Agent on whose behalf the call is made
    pub agent: AgentId,
    /// Models to try, in order; empty means the gateway default
    pub models: Vec<String>,
    pub messages: Vec<ChatMessage>,
    pub format: ResponseFormat,
}

/// A completed call
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Model that actually answered
    pub model: String,
    pub content: String,
}

/// Gateway for reasoning calls
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, GatewayError>;
}
