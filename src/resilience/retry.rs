//! Retrying client wrapper with geometric backoff.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::client::{ClientResult, RpcClient};

/// Backoff schedule for retried invocations
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffConfig {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            multiplier: 2.0,
            max_delay: Duration::from_secs(5),
        }
    }
}

impl BackoffConfig {
    /// Delay to wait after the `attempt`-th failure (1-based)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let scaled_ms =
            self.initial_delay.as_secs_f64() * 1000.0 * self.multiplier.max(1.0).powi(exponent);

        if !scaled_ms.is_finite() || scaled_ms >= self.max_delay.as_secs_f64() * 1000.0 {
            self.max_delay
        } else {
            Duration::from_millis(scaled_ms.round() as u64)
        }
    }
}

/// Retries recoverable failures of the wrapped client
#[derive(Debug, Clone)]
pub struct RetryingClient<C> {
    inner: C,
    backoff: BackoffConfig,
}

impl<C: RpcClient> RetryingClient<C> {
    pub fn new(inner: C, backoff: BackoffConfig) -> Self {
        Self { inner, backoff }
    }

    pub fn backoff(&self) -> &BackoffConfig {
        &self.backoff
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

#[async_trait]
impl<C: RpcClient> RpcClient for RetryingClient<C> {
    fn transport_name(&self) -> &'static str {
        self.inner.transport_name()
    }

    async fn invoke(&self, operation: &str, request: Value) -> ClientResult<Value> {
        let max_attempts = self.backoff.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.inner.invoke(operation, request.clone()).await {
                Ok(response) => {
                    if attempt > 1 {
                        debug!(operation, attempt, "Operation succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(error) if error.is_recoverable() && attempt < max_attempts => {
                    let delay = self.backoff.delay_for_attempt(attempt);
                    warn!(
                        operation,
                        attempt,
                        max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "Recoverable failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
