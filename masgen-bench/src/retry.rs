//! Bounded retry around a single unreliable call.

use std::future::Future;
use std::time::Duration;

/// Retries a fallible call a bounded number of times with a fixed delay.
///
/// Every error kind is retried uniformly; no distinction is made between
/// transient and permanent failures. Once attempts are exhausted the last
/// error is returned unmodified, so the caller decides whether exhaustion
/// becomes a zero score, a skipped record, or a propagated failure.
///
/// # Example
///
/// ```
/// use masgen_bench::RetryingInvoker;
///
/// # async fn example() {
/// let invoker = RetryingInvoker::default();
/// let result: Result<u32, String> = invoker.invoke(|| async { Ok(7) }).await;
/// assert_eq!(result, Ok(7));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RetryingInvoker {
    attempts: usize,
    delay: Duration,
}

impl Default for RetryingInvoker {
    /// 5 attempts total, 1 second between attempts.
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryingInvoker {
    /// Create an invoker with a custom attempt bound and delay.
    ///
    /// `attempts` is the total number of calls, clamped to at least 1.
    pub fn new(attempts: usize, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// Total number of calls made before giving up.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Invoke `target` until it succeeds or the attempt bound is reached.
    pub async fn invoke<F, Fut, T, E>(&self, mut target: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 1;
        loop {
            match target().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt >= self.attempts {
                        return Err(error);
                    }
                    log::warn!(
                        "Attempt {}/{} failed: {}; retrying in {:?}",
                        attempt,
                        self.attempts,
                        error,
                        self.delay
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
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn flaky(
        calls: &AtomicUsize,
        failures_before_success: usize,
    ) -> impl Future<Output = Result<&'static str, String>> + '_ {
        let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            if call <= failures_before_success {
                Err(format!("failure {}", call))
            } else {
                Ok("success")
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_first_try() {
        let calls = AtomicUsize::new(0);
        let result = RetryingInvoker::default()
            .invoke(|| flaky(&calls, 0))
            .await;

        assert_eq!(result, Ok("success"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_four_failures_then_success_uses_five_calls() {
        let calls = AtomicUsize::new(0);
        let result = RetryingInvoker::default()
            .invoke(|| flaky(&calls, 4))
            .await;

        assert_eq!(result, Ok("success"));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_five_failures_reraises_fifth_error_without_sixth_call() {
        let calls = AtomicUsize::new(0);
        let result = RetryingInvoker::default()
            .invoke(|| flaky(&calls, 9))
            .await;

        assert_eq!(result, Err("failure 5".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_bound_clamped_to_one() {
        let calls = AtomicUsize::new(0);
        let invoker = RetryingInvoker::new(0, Duration::from_secs(1));
        assert_eq!(invoker.attempts(), 1);

        let result = invoker.invoke(|| flaky(&calls, 9)).await;
        assert_eq!(result, Err("failure 1".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
