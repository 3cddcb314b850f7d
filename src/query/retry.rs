//! Bounded retry with capped exponential backoff for cached reads.
//!
//! The policy is a plain value so it can be tested without any I/O and passed
//! through config; [`with_retry`] is the only place that sleeps.

#[cfg(test)]
#[path = "retry_test.rs"]
mod retry_test;

use std::future::Future;
use std::time::Duration;

use crate::config::{DEFAULT_QUERY_MAX_RETRIES, DEFAULT_RETRY_BASE_MS, DEFAULT_RETRY_MAX_MS};
use crate::net::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    /// Delay before the first retry; doubles for each later one.
    pub base_delay: Duration,
    /// Ceiling for any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_QUERY_MAX_RETRIES,
            base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_MS),
            max_delay: Duration::from_millis(DEFAULT_RETRY_MAX_MS),
        }
    }
}

impl RetryPolicy {
    /// A policy that fails on the first error.
    #[must_use]
    pub const fn none() -> Self {
        Self { max_retries: 0, base_delay: Duration::ZERO, max_delay: Duration::ZERO }
    }

    /// Authorization and validation failures are never retried.
    #[must_use]
    pub fn is_retryable(&self, error: &ApiError) -> bool {
        error.retryable()
    }

    /// Delay before retry number `attempt` (0-based): `base * 2^attempt`, capped.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    /// Whether a failure on retry index `attempt` should be attempted again.
    #[must_use]
    pub fn should_retry(&self, attempt: u32, error: &ApiError) -> bool {
        attempt < self.max_retries && self.is_retryable(error)
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// policy's retry budget is spent. The last error is returned.
///
/// # Errors
///
/// Returns the final [`ApiError`] produced by `op`.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if policy.should_retry(attempt, &err) => {
                let delay = policy.delay_for_attempt(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries = policy.max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "retrying read"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
