//! Bounded exponential backoff for rate-limited upstream calls.
//!
//! Only rate-limit failures are retried. Every other error, and the last
//! rate-limit error once the budget is spent, is returned to the caller
//! unchanged. Each call has its own budget; nothing is shared between
//! concurrent invocations.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::errors::AppError;

/// Maximum retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Delay before the first retry; doubled after each one.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);

/// Errors that can tell whether they are a "slow down" signal.
pub trait RateLimitSignal {
    fn is_rate_limited(&self) -> bool;
}

impl RateLimitSignal for AppError {
    fn is_rate_limited(&self) -> bool {
        AppError::is_rate_limited(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: DEFAULT_INITIAL_DELAY,
        }
    }
}

/// Run `operation`, retrying rate-limited failures with doubling delays.
///
/// With `max_retries = 3` the operation runs at most 4 times, sleeping
/// `d`, `2d`, `4d` between attempts. No jitter.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RateLimitSignal + Display,
{
    let mut remaining = policy.max_retries;
    let mut delay = policy.initial_delay;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if remaining > 0 && e.is_rate_limited() => {
                tracing::warn!(
                    "Rate limited ({}), retrying in {}ms ({} retries left)",
                    e,
                    delay.as_millis(),
                    remaining
                );
                tokio::time::sleep(delay).await;
                remaining -= 1;
                delay = delay.saturating_mul(2);
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn rate_limited() -> AppError {
        AppError::RateLimited("RESOURCE_EXHAUSTED".to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_returns_immediately() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let start = Instant::now();

        let result = with_retry(&RetryPolicy::default(), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, AppError>(42)
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_rate_limited_runs_four_times() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let start = Instant::now();

        let result = with_retry(&RetryPolicy::default(), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(rate_limited())
        })
        .await;

        assert!(matches!(result, Err(AppError::RateLimited(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        // 1s + 2s + 4s of backoff
        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_millis(7000) && elapsed < Duration::from_millis(7100),
            "unexpected backoff total {:?}",
            elapsed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_rate_limit() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let start = Instant::now();

        let result = with_retry(&RetryPolicy::default(), move || async move {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(rate_limited())
            } else {
                Ok("snow")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "snow");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(3000) && elapsed < Duration::from_millis(3100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let result = with_retry(&RetryPolicy::default(), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(AppError::ExternalServiceError("HTTP 500".to_string()))
        })
        .await;

        match result {
            Err(AppError::ExternalServiceError(msg)) => assert_eq!(msg, "HTTP 500"),
            other => panic!("expected unchanged error, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_runs_once() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let policy = RetryPolicy {
            max_retries: 0,
            initial_delay: Duration::from_millis(500),
        };

        let result = with_retry(&policy, move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(rate_limited())
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
