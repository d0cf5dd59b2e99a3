//! Timeout configuration for Docflow client operations.
//!
//! Provides centralized timeout management for HTTP requests, push-channel
//! connection establishment and heartbeating.

use std::time::Duration;

/// Timeout configuration for Docflow client operations.
///
/// # Examples
///
/// ```rust
/// use docflow_link::DocflowLinkTimeouts;
/// use std::time::Duration;
///
/// // Use defaults (recommended for most cases)
/// let timeouts = DocflowLinkTimeouts::default();
///
/// // Custom timeouts for high-latency environments
/// let timeouts = DocflowLinkTimeouts::builder()
///     .connection_timeout(Duration::from_secs(30))
///     .request_timeout(Duration::from_secs(60))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct DocflowLinkTimeouts {
    /// Timeout for establishing the push channel (TCP + TLS + handshake).
    /// Default: 10 seconds
    pub connection_timeout: Duration,

    /// Overall timeout for a single HTTP request.
    /// Default: 30 seconds
    pub request_timeout: Duration,

    /// Application-level heartbeat interval on the push channel. Each
    /// heartbeat is a ping/pong pair used as a liveness signal and a latency
    /// probe. Set to 0 to disable.
    /// Default: 30 seconds
    pub heartbeat_interval: Duration,

    /// Maximum wait for a pong after sending a heartbeat ping. If no frame
    /// arrives within this window the connection is considered dead and
    /// torn down for reconnection. Set to 0 to disable.
    /// Default: 10 seconds
    pub pong_timeout: Duration,
}

impl Default for DocflowLinkTimeouts {
    fn default() -> Self {
        Self {
            connection_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            heartbeat_interval: Duration::from_secs(30),
            pong_timeout: Duration::from_secs(10),
        }
    }
}

impl DocflowLinkTimeouts {
    /// Create a new builder for custom timeout configuration.
    pub fn builder() -> DocflowLinkTimeoutsBuilder {
        DocflowLinkTimeoutsBuilder::new()
    }

    /// Timeouts optimized for fast local development.
    pub fn fast() -> Self {
        Self {
            connection_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(5),
            heartbeat_interval: Duration::from_secs(10),
            pong_timeout: Duration::from_secs(3),
        }
    }

    /// Timeouts optimized for high-latency or unreliable networks.
    pub fn relaxed() -> Self {
        Self {
            connection_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(120),
            heartbeat_interval: Duration::from_secs(60),
            pong_timeout: Duration::from_secs(20),
        }
    }

    /// Check if a duration represents "no timeout" (zero or absurdly large).
    pub fn is_no_timeout(duration: Duration) -> bool {
        duration.is_zero() || duration > Duration::from_secs(86400 * 365)
    }
}

/// Builder for [`DocflowLinkTimeouts`].
#[derive(Debug, Clone)]
pub struct DocflowLinkTimeoutsBuilder {
    timeouts: DocflowLinkTimeouts,
}

impl DocflowLinkTimeoutsBuilder {
    fn new() -> Self {
        Self {
            timeouts: DocflowLinkTimeouts::default(),
        }
    }

    /// Set the push-channel connection timeout.
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.connection_timeout = timeout;
        self
    }

    /// Set the HTTP request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.request_timeout = timeout;
        self
    }

    /// Set the heartbeat ping interval. Zero disables heartbeats.
    pub fn heartbeat_interval(mut self, interval: Duration) -> Self {
        self.timeouts.heartbeat_interval = interval;
        self
    }

    /// Set the pong timeout. Zero disables the check.
    pub fn pong_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.pong_timeout = timeout;
        self
    }

    /// Build the timeout configuration.
    pub fn build(self) -> DocflowLinkTimeouts {
        self.timeouts
    }
}
