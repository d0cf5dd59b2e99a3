//! Lifecycle event hooks for external collaborators.
//!
//! The library never renders anything itself; UI state holders and
//! notification dispatchers register callbacks here and receive classified
//! errors, connection lifecycle events, and authoritative state snapshots:
//!
//! - [`on_connect`](EventHandlers::on_connect): push channel established
//! - [`on_disconnect`](EventHandlers::on_disconnect): push channel closed
//! - [`on_error`](EventHandlers::on_error): classified, user-facing errors
//! - [`on_update`](EventHandlers::on_update): new authoritative job snapshot
//! - [`on_export_ready`](EventHandlers::on_export_ready): export artifact available

use crate::error::ClassifiedError;
use crate::models::{ExportReadyPayload, JobSession};
use std::fmt;
use std::sync::Arc;

/// Reason for a disconnect event.
#[derive(Debug, Clone)]
pub struct DisconnectReason {
    /// Human-readable description of why the connection closed.
    pub message: String,
    /// WebSocket close code, if available (e.g. 1000 = normal, 1006 = abnormal).
    pub code: Option<u16>,
}

impl DisconnectReason {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(message: impl Into<String>, code: u16) -> Self {
        Self {
            message: message.into(),
            code: Some(code),
        }
    }
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.code {
            write!(f, "{} (code: {})", self.message, code)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

pub type OnConnectCallback = Arc<dyn Fn() + Send + Sync>;
pub type OnDisconnectCallback = Arc<dyn Fn(DisconnectReason) + Send + Sync>;
pub type OnErrorCallback = Arc<dyn Fn(ClassifiedError) + Send + Sync>;
pub type OnUpdateCallback = Arc<dyn Fn(JobSession) + Send + Sync>;
pub type OnExportReadyCallback = Arc<dyn Fn(ExportReadyPayload) + Send + Sync>;

/// Optional lifecycle callbacks. All handlers are `Send + Sync` so they work
/// across the async runtime.
#[derive(Clone, Default)]
pub struct EventHandlers {
    pub(crate) on_connect: Option<OnConnectCallback>,
    pub(crate) on_disconnect: Option<OnDisconnectCallback>,
    pub(crate) on_error: Option<OnErrorCallback>,
    pub(crate) on_update: Option<OnUpdateCallback>,
    pub(crate) on_export_ready: Option<OnExportReadyCallback>,
}

impl fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandlers")
            .field("on_connect", &self.on_connect.is_some())
            .field("on_disconnect", &self.on_disconnect.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_update", &self.on_update.is_some())
            .field("on_export_ready", &self.on_export_ready.is_some())
            .finish()
    }
}

impl EventHandlers {
    /// Create an empty handler set (no callbacks registered).
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked when the push channel is established.
    pub fn on_connect(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_connect = Some(Arc::new(f));
        self
    }

    /// Register a callback invoked when the push channel closes.
    pub fn on_disconnect(mut self, f: impl Fn(DisconnectReason) + Send + Sync + 'static) -> Self {
        self.on_disconnect = Some(Arc::new(f));
        self
    }

    /// Register a callback invoked for classified errors that reach the
    /// caller (exhausted retries, terminal channel failures, polling caps).
    pub fn on_error(mut self, f: impl Fn(ClassifiedError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }

    /// Register a callback invoked with every new authoritative snapshot.
    pub fn on_update(mut self, f: impl Fn(JobSession) + Send + Sync + 'static) -> Self {
        self.on_update = Some(Arc::new(f));
        self
    }

    /// Register a callback invoked when the server announces an export
    /// artifact is ready for download.
    pub fn on_export_ready(
        mut self,
        f: impl Fn(ExportReadyPayload) + Send + Sync + 'static,
    ) -> Self {
        self.on_export_ready = Some(Arc::new(f));
        self
    }

    /// Returns `true` if any handler is registered.
    pub fn has_any(&self) -> bool {
        self.on_connect.is_some()
            || self.on_disconnect.is_some()
            || self.on_error.is_some()
            || self.on_update.is_some()
            || self.on_export_ready.is_some()
    }

    // ---------------------------------------------------------------
    // Internal dispatch helpers
    // ---------------------------------------------------------------

    pub(crate) fn emit_connect(&self) {
        if let Some(cb) = &self.on_connect {
            cb();
        }
    }

    pub(crate) fn emit_disconnect(&self, reason: DisconnectReason) {
        if let Some(cb) = &self.on_disconnect {
            cb(reason);
        }
    }

    pub(crate) fn emit_error(&self, error: ClassifiedError) {
        if let Some(cb) = &self.on_error {
            cb(error);
        }
    }

    pub(crate) fn emit_update(&self, snapshot: JobSession) {
        if let Some(cb) = &self.on_update {
            cb(snapshot);
        }
    }

    pub(crate) fn emit_export_ready(&self, payload: ExportReadyPayload) {
        if let Some(cb) = &self.on_export_ready {
            cb(payload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_empty_handlers_have_none() {
        let handlers = EventHandlers::new();
        assert!(!handlers.has_any());
        // Emitting with no handlers registered must be a no-op.
        handlers.emit_connect();
        handlers.emit_disconnect(DisconnectReason::new("bye"));
    }

    #[test]
    fn test_registered_handler_fires() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        let handlers = EventHandlers::new().on_connect(move || {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert!(handlers.has_any());
        handlers.emit_connect();
        handlers.emit_connect();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_disconnect_reason_display() {
        let plain = DisconnectReason::new("server closed");
        assert_eq!(plain.to_string(), "server closed");
        let coded = DisconnectReason::with_code("abnormal", 1006);
        assert_eq!(coded.to_string(), "abnormal (code: 1006)");
    }
}
