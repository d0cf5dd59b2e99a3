use serde::{Deserialize, Serialize};

/// Lifecycle phase of the push channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionPhase {
    /// No connection and none being attempted.
    #[default]
    Disconnected,
    /// Handshake in flight.
    Connecting,
    /// Channel open and confirmed.
    Connected,
    /// Lost the connection; a reconnect is scheduled or in flight.
    Reconnecting,
    /// Terminal: closed deliberately, access was denied, or the reconnect
    /// budget ran out. No further attempts.
    Closed,
}

/// Read-only snapshot of the push channel's state.
///
/// Owned by the connection manager; callers get clones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionState {
    pub phase: ConnectionPhase,
    /// Reconnection attempts since the last successful open.
    pub reconnect_attempts: u32,
    /// Millis since Unix epoch of the last heartbeat pong, if any.
    pub last_heartbeat_at_ms: Option<u64>,
    /// Round-trip latency of the last heartbeat, if measured.
    pub latency_ms: Option<u64>,
}
