//! Single-writer reconciliation of push and poll updates.
//!
//! The coordinator owns the authoritative [`JobSession`] snapshot for one
//! session. Both channels feed [`StateUpdate`]s into it over a bounded mpsc
//! channel; nothing else ever mutates the snapshot. Merged snapshots are
//! published through a `watch` channel and the `on_update` hook.
//!
//! Merge rules:
//! - Push updates overwrite every field they carry. They passed the
//!   sequence gate upstream, so they are the ordering authority.
//! - Poll updates are eventually-consistent snapshots: they apply only the
//!   fields they carry, may move the status forward but never backward, and
//!   never resurrect a terminal session.
//! - Once the status is terminal the snapshot is frozen: the coordinator
//!   stops the polling monitor, closes the push channel gracefully, and
//!   ignores every later update for the session.

use crate::{
    connection::ConnectionManager,
    event_handlers::EventHandlers,
    models::{ConnectionState, JobSession, StateUpdate, UpdateSource},
    polling::PollingMonitor,
};
use log::{debug, info};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Apply one update to a snapshot.
///
/// Returns the new snapshot when the update changes anything, `None` when
/// it must be ignored (stale session id, terminal session, or no-op).
fn reconcile(session: &JobSession, update: &StateUpdate) -> Option<JobSession> {
    if update.session_id != session.id {
        debug!(
            "[LINK_SYNC] Ignoring update for stale session {} (active: {})",
            update.session_id, session.id
        );
        return None;
    }
    if session.status.is_terminal() {
        debug!(
            "[LINK_SYNC] Ignoring {:?} update for terminal session {}",
            update.source, session.id
        );
        return None;
    }

    let mut next = session.clone();

    match update.source {
        UpdateSource::Push => {
            // Push is the ordering authority: overwrite whatever it carries.
            if let Some(status) = update.status {
                next.status = status;
            }
        },
        UpdateSource::Poll => {
            // Poll snapshots may lag; let them advance the status but never
            // drag it backwards.
            if let Some(status) = update.status {
                if status.rank() >= next.status.rank() {
                    next.status = status;
                }
            }
        },
    }

    if let Some(total) = update.total_units {
        next.total_units = total;
    }
    if let Some(completed) = update.completed_units {
        next.completed_units = completed;
    }
    if let Some(ready) = update.ready_units {
        next.ready_units = ready;
    }

    // completed_units may never exceed a known total.
    if next.total_units > 0 && next.completed_units > next.total_units {
        next.completed_units = next.total_units;
    }

    // Server-provided percentage wins; otherwise derive it from counters.
    if let Some(percent) = update.percent_complete {
        next.percent_complete = percent.min(100);
    } else if update.completed_units.is_some() || update.total_units.is_some() {
        if let Some(percent) =
            JobSession::computed_percent(next.completed_units, next.total_units)
        {
            next.percent_complete = percent;
        }
    }

    if next == *session {
        return None;
    }
    next.last_updated_at_ms = now_ms();
    Some(next)
}

/// Coordinator handle for one job session.
///
/// Created by [`DocflowLinkClient::sync`](crate::DocflowLinkClient::sync).
/// Owns the polling monitor and push channel for the session; dropping the
/// handle tears everything down.
pub struct SyncCoordinator {
    session_id: String,
    update_tx: mpsc::Sender<StateUpdate>,
    watch_rx: watch::Receiver<JobSession>,
    connection: Arc<ConnectionManager>,
    polling: Arc<PollingMonitor>,
    close_tx: Mutex<Option<oneshot::Sender<()>>>,
    _task: JoinHandle<()>,
}

impl std::fmt::Debug for SyncCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncCoordinator")
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}

impl SyncCoordinator {
    pub(crate) fn start(
        session_id: String,
        connection: Arc<ConnectionManager>,
        polling: Arc<PollingMonitor>,
        update_tx: mpsc::Sender<StateUpdate>,
        update_rx: mpsc::Receiver<StateUpdate>,
        event_handlers: EventHandlers,
    ) -> Self {
        let (watch_tx, watch_rx) = watch::channel(JobSession::new(&session_id));
        let (close_tx, close_rx) = oneshot::channel();

        let task = tokio::spawn(coordinator_task(
            session_id.clone(),
            update_rx,
            close_rx,
            watch_tx,
            event_handlers,
            connection.clone(),
            polling.clone(),
        ));

        Self {
            session_id,
            update_tx,
            watch_rx,
            connection,
            polling,
            close_tx: Mutex::new(Some(close_tx)),
            _task: task,
        }
    }

    /// The session id this coordinator tracks.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Current authoritative snapshot.
    pub fn snapshot(&self) -> JobSession {
        self.watch_rx.borrow().clone()
    }

    /// Watch channel receiver for snapshot changes.
    pub fn watch(&self) -> watch::Receiver<JobSession> {
        self.watch_rx.clone()
    }

    /// Inject a state update. This is the only mutation path; the polling
    /// monitor and push channel use the same one internally.
    pub async fn apply_update(&self, update: StateUpdate) {
        let _ = self.update_tx.send(update).await;
    }

    /// Ask the server to push a fresh status snapshot over the channel.
    pub async fn request_status(&self) -> crate::error::Result<()> {
        self.connection.request_status().await
    }

    /// Read-only snapshot of the push channel's state.
    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Whether the push channel is currently open.
    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Tear the session down: stop polling, close the channel with a normal
    /// close code, clear buffers, and reset the snapshot to defaults. Safe
    /// to call multiple times.
    pub async fn shutdown(&self) {
        self.polling.stop();
        self.connection.shutdown().await;
        let mut guard = match self.close_tx.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(tx) = guard.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for SyncCoordinator {
    fn drop(&mut self) {
        self.polling.stop();
        let mut guard = match self.close_tx.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(tx) = guard.take() {
            let _ = tx.send(());
        }
        // The connection handle is dropped with the coordinator, which
        // signals its background task to shut down.
    }
}

async fn coordinator_task(
    session_id: String,
    mut update_rx: mpsc::Receiver<StateUpdate>,
    mut close_rx: oneshot::Receiver<()>,
    watch_tx: watch::Sender<JobSession>,
    event_handlers: EventHandlers,
    connection: Arc<ConnectionManager>,
    polling: Arc<PollingMonitor>,
) {
    let mut session = JobSession::new(&session_id);

    loop {
        tokio::select! {
            _ = &mut close_rx => {
                // Explicit teardown: reset the snapshot to defaults so no
                // stale state leaks into a replacement session.
                let _ = watch_tx.send(JobSession::new(&session_id));
                debug!("[LINK_SYNC] Session {} torn down", session_id);
                return;
            }
            update = update_rx.recv() => {
                let update = match update {
                    Some(update) => update,
                    None => return, // every producer is gone
                };

                let Some(next) = reconcile(&session, &update) else {
                    continue;
                };

                let became_terminal = !session.is_terminal() && next.is_terminal();
                session = next;

                let _ = watch_tx.send(session.clone());
                event_handlers.emit_update(session.clone());

                if became_terminal {
                    info!(
                        "[LINK_SYNC] Session {} reached terminal status {}, stopping monitors",
                        session_id, session.status
                    );
                    polling.stop();
                    connection.shutdown().await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobStatus, ProgressPayload, StatusResponse};
    use crate::sequence::{SequenceGate, SequenceNumber};

    fn push_progress(seq: u64, completed: u64, total: u64) -> StateUpdate {
        StateUpdate::from_push_progress(
            "s1",
            Some(SequenceNumber::new(seq)),
            ProgressPayload {
                completed_units: Some(completed),
                total_units: Some(total),
                ..Default::default()
            },
        )
    }

    fn poll_status(status: JobStatus) -> StateUpdate {
        StateUpdate::from_poll(StatusResponse {
            session_id: "s1".to_string(),
            status: Some(status),
            ..Default::default()
        })
    }

    #[test]
    fn test_push_overwrites_carried_fields() {
        let session = JobSession::new("s1");
        let next = reconcile(&session, &push_progress(1, 2, 10)).unwrap();
        assert_eq!(next.completed_units, 2);
        assert_eq!(next.total_units, 10);
        assert_eq!(next.percent_complete, 20);
        // Fields the update did not carry are untouched.
        assert_eq!(next.status, JobStatus::Idle);
    }

    #[test]
    fn test_progress_sequence_reaches_one_hundred_percent() {
        let mut session = JobSession::new("s1");
        session = reconcile(
            &session,
            &StateUpdate::from_push_status("s1", Some(SequenceNumber::new(1)), JobStatus::Processing),
        )
        .unwrap();
        assert_eq!(session.status, JobStatus::Processing);

        for (seq, completed, expected_percent) in [(2, 2, 20), (3, 5, 50), (4, 10, 100)] {
            session = reconcile(&session, &push_progress(seq, completed, 10)).unwrap();
            assert_eq!(session.percent_complete, expected_percent);
        }

        session = reconcile(
            &session,
            &StateUpdate::from_push_status("s1", Some(SequenceNumber::new(5)), JobStatus::Completed),
        )
        .unwrap();
        assert!(session.is_terminal());

        // Terminal sessions ignore everything, from either source.
        assert!(reconcile(&session, &push_progress(6, 3, 10)).is_none());
        assert!(reconcile(&session, &poll_status(JobStatus::Processing)).is_none());
    }

    #[test]
    fn test_poll_never_regresses_status() {
        let mut session = JobSession::new("s1");
        session = reconcile(
            &session,
            &StateUpdate::from_push_status("s1", Some(SequenceNumber::new(1)), JobStatus::Analyzing),
        )
        .unwrap();

        // A stale poll snapshot claiming an earlier stage is ignored for the
        // status field.
        let stale = reconcile(&session, &poll_status(JobStatus::Processing));
        assert!(stale.is_none());

        // But a poll may advance the status.
        let advanced = reconcile(&session, &poll_status(JobStatus::Completed)).unwrap();
        assert_eq!(advanced.status, JobStatus::Completed);
    }

    #[test]
    fn test_poll_cannot_resurrect_terminal_session() {
        let mut session = JobSession::new("s1");
        session = reconcile(
            &session,
            &StateUpdate::from_push_status("s1", Some(SequenceNumber::new(1)), JobStatus::Cancelled),
        )
        .unwrap();
        assert!(reconcile(&session, &poll_status(JobStatus::Processing)).is_none());
        assert!(reconcile(&session, &poll_status(JobStatus::Completed)).is_none());
    }

    #[test]
    fn test_stale_session_id_is_ignored() {
        let session = JobSession::new("s1");
        let update = StateUpdate::from_poll(StatusResponse {
            session_id: "other".to_string(),
            status: Some(JobStatus::Processing),
            ..Default::default()
        });
        assert!(reconcile(&session, &update).is_none());
    }

    #[test]
    fn test_server_provided_percent_wins() {
        let session = JobSession::new("s1");
        let update = StateUpdate::from_push_progress(
            "s1",
            Some(SequenceNumber::new(1)),
            ProgressPayload {
                completed_units: Some(5),
                total_units: Some(10),
                percent_complete: Some(47),
                ..Default::default()
            },
        );
        let next = reconcile(&session, &update).unwrap();
        assert_eq!(next.percent_complete, 47);
    }

    #[test]
    fn test_percent_is_clamped() {
        let session = JobSession::new("s1");
        let update = StateUpdate::from_push_progress(
            "s1",
            Some(SequenceNumber::new(1)),
            ProgressPayload {
                percent_complete: Some(250),
                ..Default::default()
            },
        );
        let next = reconcile(&session, &update).unwrap();
        assert_eq!(next.percent_complete, 100);
    }

    #[test]
    fn test_completed_units_clamped_to_total() {
        let session = JobSession::new("s1");
        let next = reconcile(&session, &push_progress(1, 15, 10)).unwrap();
        assert_eq!(next.completed_units, 10);
        assert_eq!(next.percent_complete, 100);
    }

    #[test]
    fn test_gate_filtered_application_is_order_independent() {
        // Applying the same message set in any order, with the sequence gate
        // filtering duplicates and retransmissions, must produce the same
        // final snapshot.
        let updates = [
            push_progress(1, 2, 10),
            push_progress(2, 5, 10),
            push_progress(3, 10, 10),
        ];
        let orders: [[usize; 3]; 3] = [[0, 1, 2], [2, 1, 0], [1, 0, 2]];

        let mut finals = Vec::new();
        for order in orders {
            let mut gate = SequenceGate::new();
            let mut session = JobSession::new("s1");
            for idx in order {
                let update = updates[idx].clone();
                if let Some(seq) = update.sequence {
                    if !gate.accept(seq) {
                        continue;
                    }
                }
                if let Some(next) = reconcile(&session, &update) {
                    session = next;
                }
            }
            finals.push((session.completed_units, session.percent_complete));
        }
        assert_eq!(finals[0], (10, 100));
        // Orders that saw sequence 3 first keep only its effect.
        assert!(finals.iter().all(|f| f.0 == 10 && f.1 == 100));
    }
}
