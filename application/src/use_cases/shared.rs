//! Shared utilities for use cases.
//!
//! Cancellation checking and the bounded retry wrapper used around every
//! reasoning and graph call.

use crate::config::RetryPolicy;
use crate::ports::knowledge_graph::GraphError;
use crate::ports::llm_gateway::GatewayError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Check if cancellation has been requested.
pub(crate) fn is_cancelled(token: &Option<CancellationToken>) -> bool {
    token.as_ref().is_some_and(|t| t.is_cancelled())
}

/// Errors the retry wrapper knows how to classify
pub(crate) trait RetryableError: std::fmt::Display {
    fn is_retryable(&self) -> bool;
    fn timed_out(after: Duration) -> Self;
}

impl RetryableError for GatewayError {
    fn is_retryable(&self) -> bool {
        GatewayError::is_retryable(self)
    }

    fn timed_out(after: Duration) -> Self {
        GatewayError::Timeout(after)
    }
}

impl RetryableError for GraphError {
    fn is_retryable(&self) -> bool {
        GraphError::is_retryable(self)
    }

    fn timed_out(after: Duration) -> Self {
        GraphError::Timeout(after)
    }
}

/// Run `call` with a per-attempt timeout, retrying retryable failures.
///
/// A timeout counts as a retryable failure. The last error is returned
/// once `policy.max_attempts` is used up.
pub(crate) async fn call_with_retry<T, E, F, Fut>(
    operation: &str,
    policy: &RetryPolicy,
    timeout: Duration,
    mut call: F,
) -> Result<T, E>
where
    E: RetryableError,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    loop {
        let result = match tokio::time::timeout(timeout, call()).await {
            Ok(result) => result,
            Err(_) => Err(E::timed_out(timeout)),
        };

        match result {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < policy.max_attempts => {
                let delay = policy.backoff(attempt);
                warn!(
                    "{} failed (attempt {}/{}): {}; retrying in {:?}",
                    operation, attempt, policy.max_attempts, e, delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy(attempts: u32) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_attempts(attempts)
            .with_backoff(Duration::from_millis(10), Duration::from_millis(40))
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<&str, GatewayError> =
            call_with_retry("reason", &policy(3), Duration::from_secs(1), move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(GatewayError::ServerError("502".to_string()))
                } else {
                    Ok("done")
                }
            })
            .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), GatewayError> =
            call_with_retry("reason", &policy(2), Duration::from_secs(1), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(GatewayError::RateLimited("429".to_string()))
            })
            .await;

        assert!(matches!(result, Err(GatewayError::RateLimited(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_fails_fast() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), GatewayError> =
            call_with_retry("reason", &policy(5), Duration::from_secs(1), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(GatewayError::Unauthorized("401".to_string()))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_retried_then_reported() {
        let result: Result<(), GraphError> =
            call_with_retry("traverse", &policy(2), Duration::from_millis(50), move || async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;

        assert_eq!(result, Err(GraphError::Timeout(Duration::from_millis(50))));
    }
}
