//! Chat-completions gateway implementation

use super::protocol::{ChatRequest, ChatResponse};
use agora_application::{Completion, CompletionRequest, GatewayError, LlmGateway};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info};

/// LLM gateway for OpenRouter and compatible endpoints
pub struct OpenRouterGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl OpenRouterGateway {
    /// Create a gateway for `base_url` (e.g. `https://openrouter.ai/api/v1`)
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;
        let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));

        info!("OpenRouterGateway initialized for {}", endpoint);

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Map a non-success status to the gateway error taxonomy
fn status_error(status: StatusCode, body: String) -> GatewayError {
    let detail = format!("{} {}", status, body.trim());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized(detail),
        StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited(detail),
        s if s.is_server_error() => GatewayError::ServerError(detail),
        _ => GatewayError::RequestFailed(detail),
    }
}

#[async_trait]
impl LlmGateway for OpenRouterGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, GatewayError> {
        let body = ChatRequest {
            models: &request.models,
            messages: &request.messages,
            response_format: request.format.into(),
        };

        debug!(
            "Completion for {} ({} messages, {:?})",
            request.agent,
            request.messages.len(),
            request.format
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::ServerError(format!("request timed out: {}", e))
                } else {
                    GatewayError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        let (model, content) = parsed
            .into_content()
            .ok_or_else(|| GatewayError::InvalidResponse("response has no content".to_string()))?;

        debug!("{} answered for {}", model, request.agent);
        Ok(Completion { model, content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let gateway =
            OpenRouterGateway::new("https://openrouter.ai/api/v1/", "key", Duration::from_secs(5))
                .unwrap();
        assert_eq!(gateway.endpoint(), "https://openrouter.ai/api/v1/chat/completions");
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, String::new()),
            GatewayError::Unauthorized(_)
        ));
        assert!(status_error(StatusCode::TOO_MANY_REQUESTS, String::new()).is_retryable());
        assert!(status_error(StatusCode::BAD_GATEWAY, String::new()).is_retryable());
        assert!(!status_error(StatusCode::BAD_REQUEST, "bad".to_string()).is_retryable());
    }
}
