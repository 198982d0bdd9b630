//! Backoff schedule and retry policy for rate-limited reads.
//!
//! The remote API answers bursts of admin-tab traffic with 429s; the
//! policy here decides how long a call chain waits between attempts and
//! when it gives up. Only the rate-limit classification is retried -
//! writes and non-retryable read failures never pass through this module.

use std::sync::Arc;
use std::time::Duration;

use crate::error::SyncError;

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of retries for rate-limited requests.
/// 3 retries with exponential backoff usually succeeds without excessive delay.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
/// 1 second is polite to the server while not making users wait too long.
pub const INITIAL_BACKOFF_MS: u64 = 1000;

/// Ceiling on a single backoff delay in milliseconds.
/// Doubling stops here so a deep retry chain never stalls the UI for long.
pub const MAX_BACKOFF_MS: u64 = 10_000;

/// Callback invoked once per backoff wait with (key, attempt, delay).
/// Lets the UI surface a transient "retrying" indicator without the
/// cache layer knowing anything about toasts or status bars.
pub type RetryObserver = Arc<dyn Fn(&str, u32, Duration) + Send + Sync>;

/// Classifier deciding whether a fetch error should trigger a backoff
/// retry. Injectable so callers are not tied to the exact rate-limit
/// signal of one particular backend.
pub type RetryClassifier = Arc<dyn Fn(&SyncError) -> bool + Send + Sync>;

/// Backoff schedule for rate-limited reads.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Consecutive rate-limit failures tolerated before surfacing the error
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_backoff_ms: u64,
    /// Cap applied to the doubled delay
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff_ms: INITIAL_BACKOFF_MS,
            max_backoff_ms: MAX_BACKOFF_MS,
        }
    }
}

impl RetryPolicy {
    /// Delay before retrying after the given zero-based failed attempt.
    /// Doubles each attempt: initial, 2x, 4x... capped at `max_backoff_ms`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let ms = self
            .initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);
        Duration::from_millis(ms)
    }
}

// ============================================================================
// Tests
// ============================================================================
