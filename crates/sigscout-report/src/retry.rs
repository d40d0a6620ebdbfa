//! Retry with per-attempt timeout and exponential back-off.
//!
//! [`with_retry_and_timeout`] wraps any fallible async operation. Each
//! attempt races a fresh future against the attempt timeout; a timed-out
//! attempt's future is dropped, so a late result can never leak into a
//! later attempt.

use std::future::Future;
use std::time::Duration;

use anyhow::anyhow;

/// Attempt/timeout/back-off settings shared by all collector invocations.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    pub backoff_base: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, attempt_timeout_secs: u64, backoff_base_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            attempt_timeout: Duration::from_secs(attempt_timeout_secs),
            backoff_base: Duration::from_millis(backoff_base_ms),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, 30, 1_000)
    }
}

/// Runs `operation` up to `policy.max_attempts` times, sleeping
/// `backoff_base × 2^attempt` between attempts. The delay is capped at 60 s.
///
/// # Errors
///
/// Returns the last attempt's error (a timeout counts as an error) once
/// all attempts are exhausted.
pub async fn with_retry_and_timeout<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut operation: F,
) -> anyhow::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    const MAX_DELAY: Duration = Duration::from_secs(60);

    let mut last_err = None;
    for attempt in 1..=policy.max_attempts {
        match tokio::time::timeout(policy.attempt_timeout, operation()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(
                    target = label,
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %e,
                    "attempt failed"
                );
                last_err = Some(e);
            }
            Err(_) => {
                tracing::warn!(
                    target = label,
                    attempt,
                    max_attempts = policy.max_attempts,
                    timeout_ms = u64::try_from(policy.attempt_timeout.as_millis()).unwrap_or(u64::MAX),
                    "attempt timed out"
                );
                last_err = Some(anyhow!(
                    "attempt {attempt} timed out after {:.1}s",
                    policy.attempt_timeout.as_secs_f64()
                ));
            }
        }

        if attempt < policy.max_attempts {
            let delay = policy
                .backoff_base
                .saturating_mul(1u32 << attempt.min(10))
                .min(MAX_DELAY);
            tokio::time::sleep(delay).await;
        }
    }

    Err(last_err.unwrap_or_else(|| anyhow!("{label}: no attempts were made")))
}
