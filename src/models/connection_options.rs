use serde::{Deserialize, Serialize};

/// Connection-level options for the push channel.
///
/// These control reconnection timing and the outbound queue; individual
/// request behavior is configured on the request executor instead.
///
/// # Example
///
/// ```rust
/// use docflow_link::ConnectionOptions;
///
/// let options = ConnectionOptions::new()
///     .with_reconnect_delay_ms(5000)
///     .with_max_reconnect_attempts(10)
///     .with_outbound_queue_capacity(50);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionOptions {
    /// Enable automatic reconnection on abnormal connection loss.
    /// Default: true
    #[serde(default = "default_auto_reconnect")]
    pub auto_reconnect: bool,

    /// Base delay in milliseconds before the first reconnection attempt.
    /// Subsequent attempts back off by a factor of 1.5.
    /// Default: 3000 ms
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,

    /// Ceiling on the reconnection delay.
    /// Default: 30000 ms
    #[serde(default = "default_max_reconnect_delay_ms")]
    pub max_reconnect_delay_ms: u64,

    /// Maximum number of reconnection attempts before the channel gives up
    /// and reports a terminal error.
    /// Default: 5
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,

    /// Capacity of the outbound queue holding queueable messages while the
    /// channel is down. On overflow the oldest entry is evicted; queueing is
    /// best-effort, not durable.
    /// Default: 100
    #[serde(default = "default_outbound_queue_capacity")]
    pub outbound_queue_capacity: usize,
}

fn default_auto_reconnect() -> bool {
    true
}

fn default_reconnect_delay_ms() -> u64 {
    3000
}

fn default_max_reconnect_delay_ms() -> u64 {
    30000
}

fn default_max_reconnect_attempts() -> u32 {
    5
}

fn default_outbound_queue_capacity() -> usize {
    100
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            auto_reconnect: true,
            reconnect_delay_ms: 3000,
            max_reconnect_delay_ms: 30000,
            max_reconnect_attempts: 5,
            outbound_queue_capacity: 100,
        }
    }
}

impl ConnectionOptions {
    /// Create new connection options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to automatically reconnect on abnormal connection loss.
    pub fn with_auto_reconnect(mut self, enabled: bool) -> Self {
        self.auto_reconnect = enabled;
        self
    }

    /// Set the base delay between reconnection attempts (milliseconds).
    pub fn with_reconnect_delay_ms(mut self, delay_ms: u64) -> Self {
        self.reconnect_delay_ms = delay_ms;
        self
    }

    /// Set the maximum delay between reconnection attempts (milliseconds).
    pub fn with_max_reconnect_delay_ms(mut self, max_delay_ms: u64) -> Self {
        self.max_reconnect_delay_ms = max_delay_ms;
        self
    }

    /// Set the maximum number of reconnection attempts.
    pub fn with_max_reconnect_attempts(mut self, max_attempts: u32) -> Self {
        self.max_reconnect_attempts = max_attempts;
        self
    }

    /// Set the outbound queue capacity.
    pub fn with_outbound_queue_capacity(mut self, capacity: usize) -> Self {
        self.outbound_queue_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConnectionOptions::default();
        assert!(options.auto_reconnect);
        assert_eq!(options.reconnect_delay_ms, 3000);
        assert_eq!(options.max_reconnect_attempts, 5);
        assert_eq!(options.outbound_queue_capacity, 100);
    }

    #[test]
    fn test_builder_setters() {
        let options = ConnectionOptions::new()
            .with_auto_reconnect(false)
            .with_reconnect_delay_ms(1000)
            .with_max_reconnect_attempts(2)
            .with_outbound_queue_capacity(8);
        assert!(!options.auto_reconnect);
        assert_eq!(options.reconnect_delay_ms, 1000);
        assert_eq!(options.max_reconnect_attempts, 2);
        assert_eq!(options.outbound_queue_capacity, 8);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let options: ConnectionOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.reconnect_delay_ms, 3000);
        assert_eq!(options.max_reconnect_delay_ms, 30000);
    }
}
