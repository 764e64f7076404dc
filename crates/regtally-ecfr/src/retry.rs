//! Retry logic with pluggable backoff for eCFR content requests.
//!
//! Retries only transient failures (timeouts and 5xx gateway responses).
//! Non-retryable errors (404, other 4xx, transport failures, decode
//! failures) are returned immediately.
//!
//! The pause between attempts is a deliberate serialization point: it runs
//! on the calling task and nothing else is fetched meanwhile. The delay
//! schedule is a [`BackoffPolicy`] value so tests can run with
//! [`BackoffPolicy::None`] and no real waiting.

use std::future::Future;
use std::time::Duration;

use crate::error::FetchError;

/// Delay schedule between retry attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffPolicy {
    /// Retry immediately.
    None,
    /// The same pause before every retry.
    Fixed(Duration),
    /// `base`, `2 × base`, `4 × base`, … capped at `max`.
    Exponential {
        /// Pause before the first retry.
        base: Duration,
        /// Upper bound for any single pause.
        max: Duration,
    },
}

impl BackoffPolicy {
    /// The conventional policy for a given throttle delay: a fixed pause of
    /// twice the throttle.
    pub fn from_throttle(throttle: Duration) -> Self {
        Self::Fixed(throttle.saturating_mul(2))
    }

    /// Pause before retry number `retry` (1-based).
    pub fn delay(&self, retry: u32) -> Duration {
        match *self {
            Self::None => Duration::ZERO,
            Self::Fixed(delay) => delay,
            Self::Exponential { base, max } => {
                let exponent = retry.saturating_sub(1).min(31);
                base.saturating_mul(1u32 << exponent).min(max)
            }
        }
    }
}

/// Result of a retried operation plus how many attempts were made.
#[derive(Debug)]
pub(crate) struct Attempted<T> {
    pub result: Result<T, FetchError>,
    pub attempts: u32,
}

/// Run `f` once, then retry transient failures up to `max_retries` times.
///
/// The closure is called at most `max_retries + 1` times.
pub(crate) async fn retry_transient<T, F, Fut>(
    backoff: BackoffPolicy,
    max_retries: u32,
    mut f: F,
) -> Attempted<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempts = 0;
    loop {
        attempts += 1;
        match f().await {
            Err(e) if e.is_transient() && attempts <= max_retries => {
                let delay = backoff.delay(attempts);
                tracing::warn!(
                    attempt = attempts,
                    max_retries,
                    endpoint = e.endpoint(),
                    "eCFR request failed, retrying in {delay:?}: {e}"
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
            result => return Attempted { result, attempts },
        }
    }
}
