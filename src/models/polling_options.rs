use serde::{Deserialize, Serialize};

/// Options for the polling fallback monitor.
///
/// The interval is measured from the completion of one pull to the start of
/// the next, so polls never overlap. Failures stretch the interval by the
/// backoff factor up to the ceiling; a success snaps it back to the base
/// interval.
///
/// # Example
///
/// ```rust
/// use docflow_link::PollingOptions;
///
/// let options = PollingOptions::new()
///     .with_interval_ms(2000)
///     .with_max_total_attempts(300);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingOptions {
    /// Base interval between pulls, in milliseconds.
    /// Default: 5000 ms
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Multiplier applied to the interval after each failed pull.
    /// Default: 1.5
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,

    /// Ceiling on the backed-off interval.
    /// Default: 30000 ms
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,

    /// Consecutive failures after which the monitor stops with a terminal
    /// polling error.
    /// Default: 10
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: u32,

    /// Hard cap on total pulls (success or failure) before the monitor
    /// stops with a timeout error. At the default interval this is roughly
    /// one hour of polling.
    /// Default: 720
    #[serde(default = "default_max_total_attempts")]
    pub max_total_attempts: u32,
}

fn default_interval_ms() -> u64 {
    5000
}

fn default_backoff_factor() -> f64 {
    1.5
}

fn default_max_interval_ms() -> u64 {
    30000
}

fn default_max_consecutive_failures() -> u32 {
    10
}

fn default_max_total_attempts() -> u32 {
    720
}

impl Default for PollingOptions {
    fn default() -> Self {
        Self {
            interval_ms: 5000,
            backoff_factor: 1.5,
            max_interval_ms: 30000,
            max_consecutive_failures: 10,
            max_total_attempts: 720,
        }
    }
}

impl PollingOptions {
    /// Create new polling options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base polling interval (milliseconds).
    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Set the failure backoff factor.
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Set the interval ceiling (milliseconds).
    pub fn with_max_interval_ms(mut self, max_interval_ms: u64) -> Self {
        self.max_interval_ms = max_interval_ms;
        self
    }

    /// Set the consecutive-failure limit.
    pub fn with_max_consecutive_failures(mut self, limit: u32) -> Self {
        self.max_consecutive_failures = limit;
        self
    }

    /// Set the total attempt cap.
    pub fn with_max_total_attempts(mut self, limit: u32) -> Self {
        self.max_total_attempts = limit;
        self
    }

    /// Interval to wait after `consecutive_failures` failed pulls.
    pub(crate) fn backed_off_interval_ms(&self, consecutive_failures: u32) -> u64 {
        let exponent = consecutive_failures.min(40);
        let scaled = (self.interval_ms as f64) * self.backoff_factor.powi(exponent as i32);
        if scaled >= self.max_interval_ms as f64 {
            self.max_interval_ms
        } else {
            scaled.round() as u64
        }
    }
}
