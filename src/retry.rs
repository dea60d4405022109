//! Bounded retry with a fixed delay.
//!
//! Every remote read goes through [`retry_with_delay`]: the attempt is run,
//! and on failure the combinator waits [`RetryPolicy::delay`] and tries again,
//! up to [`RetryPolicy::retries`] extra times. Any error is retry-eligible.
//! Once the budget is spent the last error is handed back to the caller.

use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

/// How often and how patiently a failed call is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub retries: u32,
    /// Wait before each extra attempt.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a policy.
    pub fn new(retries: u32, delay: Duration) -> Self {
        Self { retries, delay }
    }

    /// Total attempts including the first.
    pub fn max_attempts(&self) -> u32 {
        self.retries + 1
    }
}

/// Run `operation` until it succeeds or the policy is exhausted.
///
/// `label` only feeds the log lines.
pub async fn retry_with_delay<T, E, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt <= policy.retries => {
                warn!(
                    "{} failed (attempt {}/{}): {}",
                    label,
                    attempt,
                    policy.max_attempts(),
                    e
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => {
                error!("{} failed after {} attempts: {}", label, attempt, e);
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_without_retry() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result: Result<u32, String> = retry_with_delay(RetryPolicy::default(), "op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(7) }
        })
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_third_attempt_wins_after_two_delays() {
        let calls = AtomicU32::new(0);
        let attempt_times = Mutex::new(Vec::new());
        let start = Instant::now();

        let result: Result<&str, String> = retry_with_delay(RetryPolicy::default(), "op", || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            attempt_times.lock().unwrap().push(start.elapsed());
            async move {
                if n < 3 {
                    Err(format!("io failure {}", n))
                } else {
                    Ok("payload")
                }
            }
        })
        .await;

        assert_eq!(result, Ok("payload"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let times = attempt_times.lock().unwrap().clone();
        assert_eq!(
            times,
            vec![
                Duration::ZERO,
                Duration::from_secs(1),
                Duration::from_secs(2)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_three_attempts() {
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = retry_with_delay(RetryPolicy::default(), "op", || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Err(format!("failure {}", n)) }
        })
        .await;

        assert_eq!(result, Err("failure 3".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_fails_fast() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result: Result<(), &str> =
            retry_with_delay(RetryPolicy::new(0, Duration::from_secs(1)), "op", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("nope") }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
