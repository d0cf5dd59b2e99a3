//! Inbound push-channel message envelope.
//!
//! Every server-to-client frame is a JSON envelope
//! `{ type, sequence?, payload, timestamp? }`. Order-sensitive messages
//! carry a per-session sequence number; liveness messages (`pong`,
//! `connection_confirmed`) do not. The payload shape depends on `type` and
//! is decoded lazily so a malformed payload can be skipped without tearing
//! down the channel.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::sequence::SequenceNumber;

use super::job_status::JobStatus;

/// Recognized inbound message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InboundKind {
    /// Handshake acknowledgement for this session's channel.
    ConnectionConfirmed,
    /// Reply to an application-level ping; carries no payload of interest.
    Pong,
    /// The pipeline started running.
    ProcessingStarted,
    /// Incremental progress counters.
    ProcessingProgress,
    /// The pipeline finished successfully.
    ProcessingCompleted,
    /// The pipeline failed.
    ProcessingFailed,
    /// An export artifact is ready for download.
    ExportReady,
    /// The session status changed outside the normal progress flow.
    SessionStatusChanged,
    /// Server-side error notification for this session.
    Error,
}

/// Raw inbound envelope as read off the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundEnvelope {
    #[serde(rename = "type")]
    pub kind: InboundKind,
    #[serde(default)]
    pub sequence: Option<SequenceNumber>,
    #[serde(default)]
    pub payload: JsonValue,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Payload of `connection_confirmed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfirmedPayload {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Payload of `processing_started`, `processing_progress` and
/// `processing_completed`. All fields are optional; updates carry only the
/// counters that changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_units: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_units: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_units: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<u8>,
}

/// Payload of `session_status_changed` and `processing_failed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChangedPayload {
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Payload of `export_ready`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReadyPayload {
    pub export_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Payload of `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}
