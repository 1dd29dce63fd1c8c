use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::fetch::FetchError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Bounded retry with a fixed delay between attempts.
///
/// Transport failures, timeouts and every non-2xx status are retried,
/// including 4xx: the upstream is undocumented enough that a 404 from one
/// attempt says little about the next. A successful response whose body does
/// not decode is returned immediately.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or
    /// `max_attempts` calls have failed. The error of the final attempt is
    /// returned.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= max_attempts || !err.is_retryable() => return Err(err),
                Err(err) => {
                    warn!(
                        "Upstream attempt {attempt}/{max_attempts} failed: {err}; retrying after {}ms",
                        self.delay.as_millis()
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt_after_two_retries() {
        let calls = &AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let result = RetryPolicy::default()
            .run(|| async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(FetchError::HttpStatus(500))
                } else {
                    Ok(n)
                }
            })
            .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // two sleeps of one second each
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(2) && elapsed < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_is_attempted_exactly_three_times() {
        let calls = &AtomicU32::new(0);

        let result: Result<(), _> = RetryPolicy::default()
            .run(|| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FetchError::Timeout)
            })
            .await;

        assert_eq!(result, Err(FetchError::Timeout));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_success_short_circuits() {
        let calls = &AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let result = RetryPolicy::default()
            .run(|| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, FetchError>("ok")
            })
            .await;

        assert_eq!(result, Ok("ok"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_client_errors_are_retried_too() {
        let calls = &AtomicU32::new(0);

        let result: Result<(), _> = RetryPolicy::new(3, Duration::ZERO)
            .run(|| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FetchError::HttpStatus(404))
            })
            .await;

        assert_eq!(result, Err(FetchError::HttpStatus(404)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_undecodable_body_is_not_retried() {
        let calls = &AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let result: Result<(), _> = RetryPolicy::default()
            .run(|| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FetchError::Decode("expected value at line 1".into()))
            })
            .await;

        assert!(matches!(result, Err(FetchError::Decode(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_zero_attempts_still_calls_once() {
        let calls = &AtomicU32::new(0);

        let _ = RetryPolicy::new(0, Duration::ZERO)
            .run(|| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(FetchError::Transport("refused".into()))
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
