//! State-update events flowing into the sync coordinator.
//!
//! Both channels normalize their findings into one shape: a partial update
//! tagged with its source. Push updates carry the server-assigned sequence
//! number and act as the ordering authority; poll updates never do.

use crate::sequence::SequenceNumber;

use super::job_status::JobStatus;
use super::server_message::ProgressPayload;
use super::status_response::StatusResponse;

/// Which channel produced an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateSource {
    /// Push channel; carries sequence numbers, overwrites what it touches.
    Push,
    /// Polling fallback; an eventually-consistent snapshot.
    Poll,
}

/// A partial job-state update heading for the coordinator.
#[derive(Debug, Clone)]
pub struct StateUpdate {
    pub session_id: String,
    pub source: UpdateSource,
    /// Present only on push updates of order-sensitive messages.
    pub sequence: Option<SequenceNumber>,
    pub status: Option<JobStatus>,
    pub total_units: Option<u64>,
    pub completed_units: Option<u64>,
    pub ready_units: Option<u64>,
    pub percent_complete: Option<u8>,
}

impl StateUpdate {
    /// Build a push-sourced update from a progress payload.
    pub fn from_push_progress(
        session_id: impl Into<String>,
        sequence: Option<SequenceNumber>,
        payload: ProgressPayload,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            source: UpdateSource::Push,
            sequence,
            status: payload.status,
            total_units: payload.total_units,
            completed_units: payload.completed_units,
            ready_units: payload.ready_units,
            percent_complete: payload.percent_complete,
        }
    }

    /// Build a push-sourced update that only changes the status.
    pub fn from_push_status(
        session_id: impl Into<String>,
        sequence: Option<SequenceNumber>,
        status: JobStatus,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            source: UpdateSource::Push,
            sequence,
            status: Some(status),
            total_units: None,
            completed_units: None,
            ready_units: None,
            percent_complete: None,
        }
    }

    /// Build a poll-sourced update from a status snapshot. Poll updates
    /// never carry a sequence number.
    pub fn from_poll(snapshot: StatusResponse) -> Self {
        Self {
            session_id: snapshot.session_id,
            source: UpdateSource::Poll,
            sequence: None,
            status: snapshot.status,
            total_units: snapshot.total_units,
            completed_units: snapshot.completed_units,
            ready_units: snapshot.ready_units,
            percent_complete: snapshot.percent_complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_updates_have_no_sequence() {
        let update = StateUpdate::from_poll(StatusResponse {
            session_id: "s1".to_string(),
            status: Some(JobStatus::Processing),
            ..Default::default()
        });
        assert_eq!(update.source, UpdateSource::Poll);
        assert!(update.sequence.is_none());
    }

    #[test]
    fn test_push_progress_carries_fields() {
        let update = StateUpdate::from_push_progress(
            "s1",
            Some(SequenceNumber::new(4)),
            ProgressPayload {
                completed_units: Some(5),
                total_units: Some(10),
                ..Default::default()
            },
        );
        assert_eq!(update.source, UpdateSource::Push);
        assert_eq!(update.sequence, Some(SequenceNumber::new(4)));
        assert_eq!(update.completed_units, Some(5));
        assert!(update.status.is_none());
    }
}
