//! Rate-limit retry policy with exponential backoff.

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};

/// Retry policy for rate-limited (429) responses.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Backoff before the first retry.
    pub initial_backoff: Duration,
    /// Backoff multiplier per attempt.
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_secs(2),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// Total attempts including the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Exponential backoff for a zero-based `attempt`: 2s, 4s, 8s with the
    /// default policy.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.saturating_pow(attempt);
        self.initial_backoff.saturating_mul(factor)
    }

    /// Wait before retrying after a 429.
    ///
    /// A numeric `Retry-After` header (delta seconds) always wins; anything
    /// else falls back to [`RetryPolicy::backoff`].
    pub fn delay(&self, headers: &HeaderMap, attempt: u32) -> Duration {
        retry_after(headers).unwrap_or_else(|| self.backoff(attempt))
    }
}

/// Parse a `Retry-After` header given in whole seconds.
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
