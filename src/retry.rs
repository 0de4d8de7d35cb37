use crate::errors::ProviderError;
use log::{debug, warn};
use std::future::Future;
use std::time::Duration;

/// Bounded-retry policy for a single provider call site.
///
/// The policy is plain data so the backoff curve can be unit-tested without
/// touching the network. Delays double from `min_delay` per attempt and are
/// capped at `max_delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, min_delay: Duration, max_delay: Duration) -> Self {
        RetryPolicy {
            max_attempts: max_attempts.max(1),
            min_delay,
            max_delay,
        }
    }

    /// Delay to sleep after a failed attempt. `attempt` is 1-based: the delay
    /// after the first failure is `min_delay`, then it doubles up to
    /// `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        let factor = 1u32 << exp;
        let delay = self.min_delay.saturating_mul(factor);
        delay.min(self.max_delay)
    }
}

/// Call `operation` with bounded retry on transient failures.
///
/// Non-transient errors (auth failure, not-found) propagate on the first
/// occurrence. Transient errors are retried up to `policy.max_attempts` total
/// attempts with an exponential sleep between them; the last transient error
/// is returned once the budget is exhausted.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("Call succeeded on attempt {}", attempt);
                }
                return Ok(value);
            }
            Err(err) if err.is_transient() && attempt < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                warn!(
                    "Transient error on attempt {}/{}: {}; retrying in {:?}",
                    attempt, policy.max_attempts, err, delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => {
                if err.is_transient() {
                    warn!("Giving up after {} attempts: {}", attempt, err);
                } else {
                    debug!("Non-transient error, not retrying: {}", err);
                }
                return Err(err);
            }
        }
    }
}
