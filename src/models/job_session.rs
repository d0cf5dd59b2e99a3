//! Authoritative job-session snapshot.
//!
//! Owned exclusively by the sync coordinator; every other component holds
//! read-only clones published through a watch channel.

use serde::{Deserialize, Serialize};

use super::job_status::JobStatus;

/// The single authoritative view of one processing job's state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobSession {
    /// Session id this snapshot belongs to.
    pub id: String,
    /// Current pipeline status.
    pub status: JobStatus,
    /// Total work units in the job, when known.
    pub total_units: u64,
    /// Work units fully processed.
    pub completed_units: u64,
    /// Work units processed and already available to the consumer.
    pub ready_units: u64,
    /// Overall completion percentage, always within `0..=100`.
    pub percent_complete: u8,
    /// Millis since Unix epoch of the last applied update.
    pub last_updated_at_ms: u64,
}

impl JobSession {
    /// Fresh snapshot for a new session id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Whether the session has reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Percentage derived from unit counters, clamped to `0..=100`.
    /// Returns `None` when the total is unknown.
    pub fn computed_percent(completed_units: u64, total_units: u64) -> Option<u8> {
        if total_units == 0 {
            return None;
        }
        let ratio = (completed_units as f64 / total_units as f64) * 100.0;
        Some(ratio.round().clamp(0.0, 100.0) as u8)
    }
}
