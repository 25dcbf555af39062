//! Resilient API client wrapper with exponential backoff retry
//!
//! Wraps any `RawApiPort` with retry logic. Reads (`GET`) retry on transport
//! failures, timeouts and 5xx responses. Writes (`POST`) retry only when the
//! connection was never established, so a command is never applied twice.
//! Each attempt is bounded by the policy timeout.

use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::ports::outbound::{ApiError, RawApiPort};

/// Retry and timeout configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (0 = just the initial attempt)
    pub max_retries: u32,
    /// Base delay in milliseconds before first retry
    pub base_delay_ms: u64,
    /// Maximum delay in milliseconds (caps exponential growth)
    pub max_delay_ms: u64,
    /// Jitter factor (0.0-1.0) applied around each delay
    pub jitter_factor: f64,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 500,
            max_delay_ms: 5000,
            jitter_factor: 0.2,
            timeout_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Delay before retry number `attempt` (1-based), without jitter
    pub fn backoff_ms(&self, attempt: u32) -> u64 {
        let exponential = self
            .base_delay_ms
            .saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
        exponential.min(self.max_delay_ms)
    }

    /// Backoff with ±`jitter_factor` randomization
    fn delay_ms(&self, attempt: u32) -> u64 {
        let capped = self.backoff_ms(attempt);
        let jitter_range = (capped as f64 * self.jitter_factor) as i64;
        if jitter_range > 0 {
            let jitter = rand::thread_rng().gen_range(-jitter_range..=jitter_range);
            (capped as i64 + jitter).max(0) as u64
        } else {
            capped
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }

    fn is_retryable(&self, error: &ApiError) -> bool {
        match self {
            Method::Get => match error {
                ApiError::Connect(_) | ApiError::RequestFailed(_) | ApiError::Timeout => true,
                ApiError::HttpError { status, .. } => *status >= 500,
                ApiError::ParseError(_) | ApiError::SerializeError(_) => false,
            },
            Method::Post => error.is_connect(),
        }
    }
}

/// Wrapper that adds retry logic to any raw API client
pub struct ResilientApiClient {
    inner: Arc<dyn RawApiPort>,
    policy: RetryPolicy,
}

impl ResilientApiClient {
    pub fn new(inner: Arc<dyn RawApiPort>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    async fn execute_with_retry<F, Fut>(
        &self,
        method: Method,
        path: &str,
        operation: F,
    ) -> Result<Value, ApiError>
    where
        F: Fn() -> Fut + Send + Sync,
        Fut: std::future::Future<Output = Result<Value, ApiError>> + Send,
    {
        let mut attempt = 0;
        loop {
            let outcome = tokio::time::timeout(self.policy.timeout(), operation())
                .await
                .unwrap_or(Err(ApiError::Timeout));
            match outcome {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::info!(
                            attempt = attempt + 1,
                            method = method.as_str(),
                            path,
                            "Request succeeded after retry"
                        );
                    }
                    return Ok(value);
                }
                Err(e) => {
                    if !method.is_retryable(&e) {
                        return Err(e);
                    }
                    if attempt >= self.policy.max_retries {
                        tracing::error!(
                            attempts = attempt + 1,
                            error = %e,
                            method = method.as_str(),
                            path,
                            "Request failed after all retry attempts"
                        );
                        return Err(e);
                    }

                    attempt += 1;
                    let delay = self.policy.delay_ms(attempt);
                    tracing::warn!(
                        attempt,
                        max_retries = self.policy.max_retries,
                        delay_ms = delay,
                        error = %e,
                        method = method.as_str(),
                        path,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
            }
        }
    }
}

#[async_trait]
impl RawApiPort for ResilientApiClient {
    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let inner = Arc::clone(&self.inner);
        self.execute_with_retry(Method::Get, path, || {
            let inner = Arc::clone(&inner);
            let path = path.to_string();
            async move { inner.get_json(&path).await }
        })
        .await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let inner = Arc::clone(&self.inner);
        self.execute_with_retry(Method::Post, path, || {
            let inner = Arc::clone(&inner);
            let path = path.to_string();
            let body = body.clone();
            async move { inner.post_json(&path, &body).await }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Raw API that fails a configurable number of times before succeeding
    struct FailingMockApi {
        failures_remaining: AtomicU32,
        calls: AtomicU32,
        error: ApiError,
    }

    impl FailingMockApi {
        fn new(failure_count: u32, error: ApiError) -> Arc<Self> {
            Arc::new(Self {
                failures_remaining: AtomicU32::new(failure_count),
                calls: AtomicU32::new(0),
                error,
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }

        fn answer(&self) -> Result<Value, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let remaining = self.failures_remaining.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
                Err(self.error.clone())
            } else {
                Ok(json!({"ok": true}))
            }
        }
    }

    #[async_trait]
    impl RawApiPort for FailingMockApi {
        async fn get_json(&self, _path: &str) -> Result<Value, ApiError> {
            self.answer()
        }

        async fn post_json(&self, _path: &str, _body: &Value) -> Result<Value, ApiError> {
            self.answer()
        }
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay_ms: 1,
            max_delay_ms: 10,
            jitter_factor: 0.0,
            timeout_ms: 1000,
        }
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            base_delay_ms: 100,
            max_delay_ms: 1000,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff_ms(1), 100);
        assert_eq!(policy.backoff_ms(2), 200);
        assert_eq!(policy.backoff_ms(3), 400);
        assert_eq!(policy.backoff_ms(5), 1000);
        assert_eq!(policy.backoff_ms(60), 1000);
    }

    #[test]
    fn jittered_delay_stays_within_range() {
        let policy = RetryPolicy {
            base_delay_ms: 1000,
            max_delay_ms: 1000,
            jitter_factor: 0.2,
            ..RetryPolicy::default()
        };
        for _ in 0..50 {
            let delay = policy.delay_ms(1);
            assert!((800..=1200).contains(&delay), "delay {delay} out of range");
        }
    }

    #[tokio::test]
    async fn get_retries_transient_failures() {
        let mock = FailingMockApi::new(2, ApiError::Timeout);
        let client = ResilientApiClient::new(mock.clone(), fast_policy(3));

        let result = client.get_json("/game/state/1").await;

        assert!(result.is_ok());
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn get_retries_server_errors_but_not_client_errors() {
        let server = FailingMockApi::new(
            1,
            ApiError::HttpError {
                status: 503,
                message: "busy".into(),
            },
        );
        let client = ResilientApiClient::new(server.clone(), fast_policy(2));
        assert!(client.get_json("/x").await.is_ok());
        assert_eq!(server.calls(), 2);

        let missing = FailingMockApi::new(
            1,
            ApiError::HttpError {
                status: 404,
                message: "Game session not found.".into(),
            },
        );
        let client = ResilientApiClient::new(missing.clone(), fast_policy(2));
        assert!(client.get_json("/x").await.is_err());
        assert_eq!(missing.calls(), 1);
    }

    #[tokio::test]
    async fn get_gives_up_after_max_retries() {
        let mock = FailingMockApi::new(10, ApiError::RequestFailed("reset".into()));
        let client = ResilientApiClient::new(mock.clone(), fast_policy(2));

        let err = client.get_json("/x").await.unwrap_err();

        assert_eq!(err, ApiError::RequestFailed("reset".into()));
        assert_eq!(mock.calls(), 3);
    }

    /// Raw API that never answers
    struct HangingApi {
        calls: AtomicU32,
    }

    #[async_trait]
    impl RawApiPort for HangingApi {
        async fn get_json(&self, _path: &str) -> Result<Value, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::future::pending().await
        }

        async fn post_json(&self, _path: &str, _body: &Value) -> Result<Value, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn hung_requests_time_out_per_attempt() {
        let hanging = Arc::new(HangingApi {
            calls: AtomicU32::new(0),
        });
        let policy = RetryPolicy {
            timeout_ms: 20,
            ..fast_policy(1)
        };
        let client = ResilientApiClient::new(hanging.clone(), policy);

        assert_eq!(client.get_json("/game/state/1").await, Err(ApiError::Timeout));
        assert_eq!(hanging.calls.load(Ordering::SeqCst), 2);

        let before = hanging.calls.load(Ordering::SeqCst);
        assert_eq!(
            client.post_json("/game/command", &json!({})).await,
            Err(ApiError::Timeout)
        );
        assert_eq!(hanging.calls.load(Ordering::SeqCst), before + 1);
    }

    #[tokio::test]
    async fn post_is_not_retried_once_the_request_was_sent() {
        let mock = FailingMockApi::new(1, ApiError::Timeout);
        let client = ResilientApiClient::new(mock.clone(), fast_policy(3));

        let result = client.post_json("/game/command", &json!({})).await;

        assert_eq!(result, Err(ApiError::Timeout));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn post_is_retried_when_connection_failed() {
        let mock = FailingMockApi::new(1, ApiError::Connect("refused".into()));
        let client = ResilientApiClient::new(mock.clone(), fast_policy(3));

        let result = client.post_json("/game/command", &json!({})).await;

        assert!(result.is_ok());
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn zero_retries_means_single_attempt() {
        let mock = FailingMockApi::new(1, ApiError::Connect("refused".into()));
        let client = ResilientApiClient::new(mock.clone(), fast_policy(0));

        assert!(client.get_json("/x").await.is_err());
        assert_eq!(mock.calls(), 1);
    }
}
