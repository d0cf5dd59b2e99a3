//! # docflow-link
//!
//! Client synchronization library for the Docflow document-processing
//! pipeline. Keeps a local, monotonically-advancing view of a server-side
//! job in sync despite an unreliable network:
//!
//! - A persistent WebSocket **push channel** delivers incremental progress
//!   events, with heartbeats, sequence-number dedup, bounded outbound
//!   queueing, and automatic reconnection with exponential backoff.
//! - A **polling monitor** pulls status snapshots as a safety net whenever
//!   the push channel is unavailable or quiet, with its own failure backoff
//!   and attempt budget.
//! - A retrying **request executor** runs every HTTP call with auth-header
//!   injection, correlation-id tagging, and backoff on transient failures.
//! - A **sync coordinator** merges both feeds into one authoritative
//!   [`JobSession`] snapshot with idempotent terminal states.
//!
//! # Example
//!
//! ```rust,no_run
//! use docflow_link::{DocflowLinkClient, EventHandlers};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DocflowLinkClient::builder()
//!     .base_url("https://docflow.example.com")
//!     .access_token("eyJhbGc...")
//!     .event_handlers(EventHandlers::new().on_update(|snapshot| {
//!         println!("{}: {}%", snapshot.status, snapshot.percent_complete);
//!     }))
//!     .build()?;
//!
//! client.start_processing("session-1").await?;
//! let sync = client.sync("session-1").await?;
//!
//! let mut watch = sync.watch();
//! while watch.changed().await.is_ok() {
//!     if watch.borrow().is_terminal() {
//!         break;
//!     }
//! }
//! sync.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod backoff;
pub mod client;
pub mod connection;
pub mod coordinator;
pub mod correlation;
pub mod error;
pub mod event_handlers;
pub mod executor;
pub mod models;
pub mod outbound_queue;
pub mod polling;
pub mod sequence;
pub mod timeouts;

pub use auth::AuthProvider;
pub use backoff::BackoffPolicy;
pub use client::{DocflowLinkClient, DocflowLinkClientBuilder};
pub use connection::ConnectionManager;
pub use coordinator::SyncCoordinator;
pub use correlation::{CorrelationLog, CorrelationRecord};
pub use error::{ClassifiedError, DocflowLinkError, ErrorKind, Result};
pub use event_handlers::{DisconnectReason, EventHandlers};
pub use executor::RequestExecutor;
pub use models::{
    ClientMessage, ConnectionOptions, ConnectionPhase, ConnectionState, ExportReadyPayload,
    HealthCheckResponse, InboundEnvelope, InboundKind, JobSession, JobStatus, LoginResponse,
    PollingOptions, StateUpdate, StatusResponse, UpdateSource,
};
pub use outbound_queue::{OutboundQueue, OutboundQueueEntry};
pub use polling::PollingMonitor;
pub use sequence::{SequenceGate, SequenceNumber};
pub use timeouts::{DocflowLinkTimeouts, DocflowLinkTimeoutsBuilder};
