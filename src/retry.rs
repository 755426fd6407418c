// src/retry.rs
//! Transparent retry for rate-limited API calls.
//!
//! The service throttles aggressive callers with HTTP 429. Those calls are
//! retried behind the caller's back with jittered exponential backoff;
//! every other error propagates immediately, untouched.

use crate::constants::{RETRY_BASE_DELAY, RETRY_MAX_ATTEMPTS, RETRY_MAX_DELAY};
use crate::error::Error;
use rand::Rng;
use std::time::Duration;

/// Bounded retry-with-backoff policy for rate-limited operations.
///
/// The default budget is 5 attempts starting at a 1 second delay. Callers
/// that want the historical keep-trying-forever behavior opt in through
/// [`RetryPolicy::unbounded`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles each attempt.
    pub base_delay: Duration,
    /// Cap on the backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            base_delay: RETRY_BASE_DELAY,
            max_delay: RETRY_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: RETRY_MAX_DELAY.max(base_delay),
        }
    }

    /// Retry rate-limited calls forever, sleeping a fixed delay between
    /// attempts. Liveness becomes the remote's problem; use sparingly.
    pub fn unbounded() -> Self {
        Self {
            max_attempts: u32::MAX,
            base_delay: RETRY_BASE_DELAY,
            max_delay: RETRY_BASE_DELAY,
        }
    }

    /// Runs `operation`, retrying while it fails with a rate-limit error
    /// and the attempt budget lasts.
    ///
    /// Only rate-limit errors are retried; any other error propagates to
    /// the caller on the first occurrence.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, Error>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, Error>>,
    {
        let mut delay = self.base_delay;
        let mut attempt = 1u32;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_rate_limited() && attempt < self.max_attempts => {
                    let backoff = jittered(delay);
                    log::warn!(
                        "Rate limited (attempt {}/{}), retrying after {:?}",
                        attempt,
                        self.max_attempts,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                    delay = std::cmp::min(delay.saturating_mul(2), self.max_delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Adds up to 25% random jitter so synchronized clients don't stampede
/// the endpoint in lockstep after a shared throttle window.
fn jittered(delay: Duration) -> Duration {
    let millis = delay.as_millis() as u64;
    if millis == 0 {
        return delay;
    }
    let spread = millis / 4;
    let offset = rand::rng().random_range(0..=spread);
    Duration::from_millis(millis + offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn success_passes_through_without_retry() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let result = quick(5)
            .run(|| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Error>(7)
            })
            .await
            .unwrap();
        assert_eq!(result, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rate_limit_is_retried_until_success() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let result = quick(5)
            .run(|| async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(Error::rate_limited("throttled"))
                } else {
                    Ok(42)
                }
            })
            .await
            .unwrap();
        assert_eq!(result, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn other_errors_propagate_immediately() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let err = quick(5)
            .run(|| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(Error::not_found("gone"))
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn attempt_budget_is_honored() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let err = quick(3)
            .run(|| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(Error::rate_limited("throttled"))
            })
            .await
            .unwrap_err();
        assert!(err.is_rate_limited());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
