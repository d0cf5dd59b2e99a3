//! Data models for the docflow-link client library.
//!
//! Wire messages for the push channel, HTTP request/response bodies, and
//! the configuration and state types shared across components.

pub mod client_message;
pub mod connection_options;
pub mod connection_state;
pub mod health_check_response;
pub mod job_session;
pub mod job_status;
pub mod login_request;
pub mod login_response;
pub mod polling_options;
pub mod server_message;
pub mod state_update;
pub mod status_response;

pub use client_message::ClientMessage;
pub use connection_options::ConnectionOptions;
pub use connection_state::{ConnectionPhase, ConnectionState};
pub use health_check_response::HealthCheckResponse;
pub use job_session::JobSession;
pub use job_status::JobStatus;
pub use login_request::LoginRequest;
pub use login_response::LoginResponse;
pub use polling_options::PollingOptions;
pub use server_message::{
    ConnectionConfirmedPayload, ErrorPayload, ExportReadyPayload, InboundEnvelope, InboundKind,
    ProgressPayload, StatusChangedPayload,
};
pub use state_update::{StateUpdate, UpdateSource};
pub use status_response::StatusResponse;
