//! Shared backoff computation for retries and reconnection.
//!
//! One parameterized attempt-to-delay policy covers all three call sites:
//! HTTP request retries (factor 2.0, no ceiling), polling-interval backoff
//! (factor 1.5, 30 s ceiling) and push-channel reconnection (factor 1.5,
//! 30 s ceiling). Call sites differ only in constants.

use std::time::Duration;

/// Exponential backoff policy: `base * factor^(attempt-1)`, optionally
/// capped at a maximum delay.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    base_delay_ms: u64,
    factor: f64,
    max_delay_ms: Option<u64>,
}

impl BackoffPolicy {
    pub fn new(base_delay_ms: u64, factor: f64, max_delay_ms: Option<u64>) -> Self {
        Self {
            base_delay_ms,
            factor,
            max_delay_ms,
        }
    }

    /// Policy used for HTTP request retries.
    pub fn request_retry(base_delay_ms: u64) -> Self {
        Self::new(base_delay_ms, 2.0, None)
    }

    /// Policy used for push-channel reconnection scheduling.
    pub fn reconnect(base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self::new(base_delay_ms, 1.5, Some(max_delay_ms))
    }

    pub fn base_delay_ms(&self) -> u64 {
        self.base_delay_ms
    }

    /// Delay before the given attempt, 1-based: attempt 1 waits the base
    /// delay, attempt 2 waits `base * factor`, and so on.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(40);
        let scaled = (self.base_delay_ms as f64) * self.factor.powi(exponent as i32);
        let mut delay_ms = if scaled >= u64::MAX as f64 {
            u64::MAX
        } else {
            scaled.round() as u64
        };
        if let Some(max) = self.max_delay_ms {
            delay_ms = delay_ms.min(max);
        }
        Duration::from_millis(delay_ms)
    }
}
