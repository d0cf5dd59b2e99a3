//! Pull-based polling fallback.
//!
//! The monitor periodically pulls `GET /status/{session_id}` through the
//! request executor and forwards every successful snapshot to the
//! coordinator as a poll-sourced update. It exists as a safety net for when
//! the push channel is down or quiet; its snapshots are merged
//! idempotently and never treated as an ordering authority.
//!
//! Scheduling is interval-from-completion: the next pull is scheduled only
//! after the previous one finished, so pulls never overlap. Failures
//! stretch the interval by the backoff factor up to a ceiling; a success
//! snaps it back. The monitor stops on its own when the pulled status is
//! terminal, after too many consecutive failures, or when the total
//! attempt budget runs out.

use crate::{
    error::DocflowLinkError,
    event_handlers::EventHandlers,
    executor::RequestExecutor,
    models::{PollingOptions, StateUpdate, StatusResponse},
};
use log::{debug, info, warn};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Handle to a running polling monitor.
///
/// Dropping the handle stops the monitor; [`stop`](PollingMonitor::stop) is
/// idempotent and cancels any pending timer.
pub struct PollingMonitor {
    close_tx: Mutex<Option<oneshot::Sender<()>>>,
    _task: JoinHandle<()>,
}

impl PollingMonitor {
    /// Start polling for one session. The first pull is issued immediately.
    pub(crate) fn start(
        executor: RequestExecutor,
        session_id: String,
        options: PollingOptions,
        update_tx: mpsc::Sender<StateUpdate>,
        event_handlers: EventHandlers,
    ) -> Self {
        let (close_tx, close_rx) = oneshot::channel();
        let task = tokio::spawn(polling_task(
            executor,
            session_id,
            options,
            update_tx,
            event_handlers,
            close_rx,
        ));
        Self {
            close_tx: Mutex::new(Some(close_tx)),
            _task: task,
        }
    }

    /// Stop the monitor. Safe to call multiple times.
    pub fn stop(&self) {
        let mut guard = match self.close_tx.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(tx) = guard.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for PollingMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn polling_task(
    executor: RequestExecutor,
    session_id: String,
    options: PollingOptions,
    update_tx: mpsc::Sender<StateUpdate>,
    event_handlers: EventHandlers,
    mut close_rx: oneshot::Receiver<()>,
) {
    let mut consecutive_failures: u32 = 0;
    let mut total_attempts: u32 = 0;
    let mut interval_ms = options.interval_ms;
    let path = format!("/status/{}", session_id);

    loop {
        if total_attempts >= options.max_total_attempts {
            let err = DocflowLinkError::PollingTimeoutExceeded(format!(
                "session {}: {} total polling attempts exhausted",
                session_id, options.max_total_attempts
            ));
            warn!("[LINK_POLL] {}", err);
            event_handlers.emit_error(err.classify());
            return;
        }
        total_attempts += 1;

        match executor.get_json::<StatusResponse>(&path).await {
            Ok(snapshot) => {
                consecutive_failures = 0;
                interval_ms = options.interval_ms;

                let terminal = snapshot.status.map(|s| s.is_terminal()).unwrap_or(false);
                debug!(
                    "[LINK_POLL] Pull ok: session={} status={:?} (attempt {})",
                    session_id, snapshot.status, total_attempts
                );

                if update_tx.send(StateUpdate::from_poll(snapshot)).await.is_err() {
                    // Coordinator is gone; nothing left to feed.
                    return;
                }

                if terminal {
                    info!(
                        "[LINK_POLL] Session {} reached a terminal status, stopping",
                        session_id
                    );
                    return;
                }
            },
            Err(e) => {
                consecutive_failures += 1;
                warn!(
                    "[LINK_POLL] Pull failed ({} consecutive): {}",
                    consecutive_failures, e
                );

                if consecutive_failures >= options.max_consecutive_failures {
                    warn!(
                        "[LINK_POLL] Giving up after {} consecutive failures",
                        consecutive_failures
                    );
                    event_handlers.emit_error(e.classify());
                    return;
                }

                interval_ms = options.backed_off_interval_ms(consecutive_failures);
            },
        }

        // Interval is measured from completion of the pull, never wall-clock
        // fixed-rate.
        tokio::select! {
            _ = &mut close_rx => {
                debug!("[LINK_POLL] Stopped for session {}", session_id);
                return;
            }
            _ = tokio::time::sleep(Duration::from_millis(interval_ms)) => {}
        }
    }
}
