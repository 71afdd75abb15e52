//! Bounded exponential-backoff retry for TMDB calls.

use std::future::Future;
use std::time::Duration;

use crate::error::TmdbError;

/// Delay before the second attempt; doubles for each attempt after that.
pub const BASE_DELAY: Duration = Duration::from_millis(250);

/// Upper bound for a single backoff delay.
pub const MAX_DELAY: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: BASE_DELAY,
        }
    }

    /// Backoff after the given failed attempt (1-based): 250 ms, 500 ms, 1 s, ...
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << exp)
            .min(MAX_DELAY)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt cap is reached. The last error is returned.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, TmdbError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TmdbError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = self.delay_after(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        endpoint = label,
                        error = %e,
                        "TMDB attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    if attempt > 1 {
                        tracing::error!(attempt, endpoint = label, error = %e, "TMDB call failed");
                    }
                    return Err(e);
                }
            }
        }
    }
}
