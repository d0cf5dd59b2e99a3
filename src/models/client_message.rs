use serde::{Deserialize, Serialize};

use crate::sequence::SequenceNumber;

/// Client-to-server push-channel messages.
///
/// Job-control commands (process/pause/resume/cancel/export) never travel
/// over the channel; they go through the HTTP request executor so they get
/// retries and correlation ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Application-level heartbeat ping. The server replies with `pong`.
    Ping,

    /// Ask the server to replay any messages missed while disconnected,
    /// starting after the given sequence number.
    StateSyncRequest {
        #[serde(skip_serializing_if = "Option::is_none")]
        last_sequence: Option<SequenceNumber>,
    },

    /// Ask the server to push a fresh status snapshot for a session.
    RequestStatus { session_id: String },
}

impl ClientMessage {
    /// Whether this message may be held in the outbound queue while the
    /// channel is down. Pings and status requests are harmless to replay
    /// later; a state-sync request is only meaningful immediately after a
    /// reconnect and is rebuilt from the sequence gate at that point, so a
    /// queued one would be stale.
    pub fn is_queueable(&self) -> bool {
        matches!(self, Self::Ping | Self::RequestStatus { .. })
    }
}
