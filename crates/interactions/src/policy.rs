//! Retry and wait configuration

use std::time::Duration;

/// Attempt budget for one interaction operation.
///
/// `max_attempts` counts every underlying attempt, the first one included,
/// and is never below 1. Intermediate failures back off by `backoff` before
/// the next attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// A single attempt, no backoff.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        // The suite's historical budget: three tries, half a second apart.
        Self::new(3, Duration::from_millis(500))
    }
}
