//! Exponential-backoff retry for transient page fetch failures.
//!
//! Retrying is off by default: with `max_retries == 0` the first error is
//! returned as is. Only errors for which
//! [`kickstarter_api::Error::is_transient`] holds are retried.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;

/// Default delay before the first retry.
const DEFAULT_BASE_BACKOFF: Duration = Duration::from_secs(5);

/// Upper bound of the random jitter added to every delay.
const MAX_JITTER: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl RetryPolicy {
    /// Fail on the first error.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_backoff: DEFAULT_BASE_BACKOFF,
        }
    }

    pub fn with_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::none()
        }
    }

    /// Delay before retry number `attempt + 1`: `base * 2^attempt`, without jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_backoff * (1u32 << attempt.min(16))
    }
}

/// Runs `operation`, retrying transient failures according to `policy`.
pub async fn with_retry<F, Fut, T>(
    policy: &RetryPolicy,
    operation: F,
) -> Result<T, kickstarter_api::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, kickstarter_api::Error>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                let jitter_ms = rand::thread_rng().gen_range(0..=MAX_JITTER.as_millis() as u64);
                let wait = policy.backoff(attempt) + Duration::from_millis(jitter_ms);
                tracing::warn!(
                    kind = e.kind().as_str(),
                    error = %e,
                    attempt = attempt + 1,
                    max_retries = policy.max_retries,
                    wait_ms = wait.as_millis() as u64,
                    "transient fetch failure, retrying"
                );
                sleep(wait).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
