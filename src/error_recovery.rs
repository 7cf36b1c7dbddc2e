//! Retry with exponential backoff for page fetches.

use crate::algebras::FetchError;
use std::time::Duration;

/// How hard to retry a transient failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: crate::constants::FETCH_RETRY_ATTEMPTS,
            initial_delay: crate::constants::FETCH_RETRY_INITIAL_DELAY,
            max_delay: crate::constants::FETCH_RETRY_MAX_DELAY,
        }
    }
}

/// Retries an async operation with exponential backoff.
///
/// Only errors for which [`FetchError::is_retryable`] holds are retried;
/// anything else is returned on the spot. A rate-limit response that names a
/// retry delay waits at least that long.
pub async fn retry_with_backoff<F, T, Fut>(
    mut operation: F,
    policy: RetryPolicy,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, FetchError>>,
{
    let mut delay = policy.initial_delay;
    let mut last_error = None;

    for attempt in 1..=policy.max_attempts.max(1) {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => {
                let wait = match &e {
                    FetchError::RateLimited {
                        retry_after_seconds: Some(seconds),
                    } => delay.max(Duration::from_secs(*seconds)),
                    _ => delay,
                };
                last_error = Some(e);

                if attempt < policy.max_attempts {
                    log::warn!("Attempt {} failed, retrying after {:?}", attempt, wait);
                    tokio::time::sleep(wait).await;

                    // Exponential backoff with cap
                    delay = std::cmp::min(delay * 2, policy.max_delay);
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| FetchError::Other {
        message: "Retry failed with no error".to_string(),
    }))
}
