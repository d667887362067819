//! Retry with exponential backoff for provider calls.
//!
//! The loop is generic over the error type; callers hand in a classifier
//! that maps each error to a [`RetryClass`]. Rate limits get a longer
//! starting delay than other transient failures.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// What the retry loop should do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    /// Try again on the normal backoff schedule.
    Retry,
    /// Try again, starting from the longer rate-limit delay.
    RetryRateLimited,
    /// Give up immediately and surface the error.
    Fatal,
}

/// Backoff schedule. Injected rather than hard-coded so tests and
/// individual endpoints can tighten it.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, counting the first.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Delay before the second attempt when the provider rate-limited us.
    pub rate_limit_initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            rate_limit_initial_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Delay after the `attempt`-th failure (1-based). Doubles each time:
    /// 1s, 2s, 4s on the normal schedule, 5s, 10s, 20s when rate limited.
    pub fn delay_for(&self, attempt: u32, rate_limited: bool) -> Duration {
        let base = if rate_limited {
            self.rate_limit_initial_delay
        } else {
            self.initial_delay
        };
        base * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Runs `op` until it succeeds, `classify` declares the error fatal, or
/// `policy.max_attempts` is exhausted. The final error is returned
/// unchanged so callers keep the original classification.
pub async fn retry_with_backoff<T, E, F, Fut, C>(
    policy: &RetryPolicy,
    classify: C,
    mut op: F,
) -> std::result::Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    C: Fn(&E) -> RetryClass,
{
    let mut attempt = 1u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let class = classify(&err);
                if class == RetryClass::Fatal || attempt >= policy.max_attempts {
                    return Err(err);
                }
                let delay = policy.delay_for(attempt, class == RetryClass::RetryRateLimited);
                warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
