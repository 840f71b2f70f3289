//! Reusable retry policy with exponential backoff.
//!
//! A [`RetryPolicy`] is a plain value (max attempts + initial backoff)
//! applied uniformly wherever transient external failures warrant retries
//! - playlist creation being the main consumer.

use std::future::Future;
use std::time::Duration;

/// Retry budget: how many attempts, and how long to back off between them.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff,
        }
    }

    /// Backoff before retry number `attempt` (0-based): doubles each time.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.initial_backoff * 2u32.saturating_pow(attempt)
    }

    /// Run `op` until it succeeds or the attempt budget is exhausted,
    /// sleeping the backoff between attempts. The final error is returned
    /// as-is.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.max_attempts.max(1) {
                        return Err(e);
                    }
                    let delay = self.backoff(attempt - 1);
                    tracing::warn!(
                        attempt,
                        max = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "operation failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    /// Three attempts, backing off 1s then 2s.
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}
