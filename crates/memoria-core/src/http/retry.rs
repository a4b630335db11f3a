//! Retry logic with exponential backoff for HTTP requests
//!
//! One logical operation is retried while its failures are transient and the
//! budget allows. The delay before retry `n` (0-based) is
//! `min(retry_delay * 2^n, max_retry_delay)`.

use std::future::Future;
use std::time::Duration;

use crate::http::error::{normalize, RequestFailure};
use crate::Result;

/// Retry policy configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; 0 runs the operation exactly once
    pub max_retries: u32,
    /// Delay before the first retry
    pub retry_delay: Duration,
    /// Ceiling applied to every delay
    pub max_retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(1_000),
            max_retry_delay: Duration::from_millis(10_000),
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy with custom settings
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Policy that never retries
    pub fn no_retry() -> Self {
        Self::new(0)
    }

    /// Set the initial delay
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set the maximum delay
    pub fn with_max_retry_delay(mut self, delay: Duration) -> Self {
        self.max_retry_delay = delay;
        self
    }

    /// Delay before retrying after the failed attempt `attempt` (0-based)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.retry_delay
            .saturating_mul(factor)
            .min(self.max_retry_delay)
    }

    /// Total attempts this policy allows
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Sum of every backoff delay when all attempts fail transiently
    pub fn total_backoff(&self) -> Duration {
        (0..self.max_retries)
            .map(|attempt| self.delay_for_attempt(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

/// Decision on whether to retry a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry the request after the specified delay
    Retry { delay: Duration },
    /// Do not retry the request
    NoRetry,
}

/// Retry state for one logical operation
#[derive(Debug)]
pub struct RetryHandler {
    policy: RetryPolicy,
    attempt: u32,
}

impl RetryHandler {
    /// Create a new retry handler with the given policy
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy, attempt: 0 }
    }

    /// Determine if a request should be retried after `failure`
    pub fn should_retry(&mut self, failure: &RequestFailure) -> RetryDecision {
        if !failure.is_retryable() {
            return RetryDecision::NoRetry;
        }

        if self.attempt >= self.policy.max_retries {
            return RetryDecision::NoRetry;
        }

        let delay = self.policy.delay_for_attempt(self.attempt);
        self.attempt += 1;

        RetryDecision::Retry { delay }
    }

    /// Index of the attempt currently in flight (0-based)
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

/// Execute an operation with retry logic
///
/// `operation` must perform exactly one network attempt per call. The backoff
/// sleep yields to the runtime, so other in-flight operations keep running.
pub async fn execute_with_retry<F, Fut, T>(policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, RequestFailure>>,
{
    let mut handler = RetryHandler::new(*policy);

    loop {
        let failure = match operation().await {
            Ok(value) => return Ok(value),
            Err(failure) => failure,
        };

        match handler.should_retry(&failure) {
            RetryDecision::Retry { delay } => {
                tracing::warn!(
                    attempt = handler.attempt(),
                    delay_ms = delay.as_millis() as u64,
                    failure = %failure,
                    "Request failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            RetryDecision::NoRetry => {
                tracing::debug!(
                    attempts = handler.attempt() + 1,
                    retryable = failure.is_retryable(),
                    failure = %failure,
                    "Request failed, not retrying"
                );
                return Err(normalize(failure));
            }
        }
    }
}
