//! Main Docflow client with builder pattern.
//!
//! Provides the primary interface for issuing job-control commands and for
//! opening a synchronized view of a processing session.

use crate::{
    auth::AuthProvider,
    connection::ConnectionManager,
    coordinator::SyncCoordinator,
    correlation::{CorrelationLog, CorrelationRecord},
    error::{DocflowLinkError, Result},
    event_handlers::EventHandlers,
    executor::RequestExecutor,
    models::{
        ConnectionOptions, HealthCheckResponse, LoginRequest, LoginResponse, PollingOptions,
        StatusResponse,
    },
    polling::PollingMonitor,
    timeouts::DocflowLinkTimeouts,
};
use log::debug;
use serde_json::json;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{mpsc, Mutex};

/// Capacity of the update channel between the monitors and the coordinator.
const UPDATE_CHANNEL_CAPACITY: usize = 256;

const HEALTH_CHECK_TTL: Duration = Duration::from_secs(10);

/// Main Docflow client.
///
/// Use [`DocflowLinkClientBuilder`] to construct instances with custom
/// configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use docflow_link::DocflowLinkClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = DocflowLinkClient::builder()
///     .base_url("http://localhost:3000")
///     .build()?;
///
/// client.start_processing("session-1").await?;
/// let sync = client.sync("session-1").await?;
/// println!("status: {}", sync.snapshot().status);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DocflowLinkClient {
    base_url: String,
    http_client: reqwest::Client,
    auth: AuthProvider,
    executor: RequestExecutor,
    timeouts: DocflowLinkTimeouts,
    connection_options: ConnectionOptions,
    polling_options: PollingOptions,
    event_handlers: EventHandlers,
    diagnostics: Arc<CorrelationLog>,
    health_cache: Arc<Mutex<HealthCheckCache>>,
}

impl DocflowLinkClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> DocflowLinkClientBuilder {
        DocflowLinkClientBuilder::new()
    }

    /// Open a synchronized view of a processing session.
    ///
    /// Starts the push channel immediately and the polling monitor as a
    /// safety net; both feed the returned coordinator, which owns the
    /// authoritative snapshot. One coordinator per session.
    pub async fn sync(&self, session_id: &str) -> Result<SyncCoordinator> {
        let (update_tx, update_rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);

        let connection = Arc::new(
            ConnectionManager::connect(
                self.base_url.clone(),
                session_id.to_string(),
                self.auth.clone(),
                self.timeouts.clone(),
                self.connection_options.clone(),
                self.event_handlers.clone(),
                update_tx.clone(),
            )
            .await?,
        );

        let polling = Arc::new(PollingMonitor::start(
            self.executor.clone(),
            session_id.to_string(),
            self.polling_options.clone(),
            update_tx.clone(),
            self.event_handlers.clone(),
        ));

        Ok(SyncCoordinator::start(
            session_id.to_string(),
            connection,
            polling,
            update_tx,
            update_rx,
            self.event_handlers.clone(),
        ))
    }

    /// Pull one status snapshot directly, outside any coordinator.
    pub async fn fetch_status(&self, session_id: &str) -> Result<StatusResponse> {
        self.executor
            .get_json(&format!("/status/{}", session_id))
            .await
    }

    // ── Job control ─────────────────────────────────────────────────────

    /// Start processing a session's documents.
    pub async fn start_processing(&self, session_id: &str) -> Result<()> {
        self.executor
            .post("/process", json!({ "session_id": session_id }))
            .await
    }

    /// Pause a running session.
    pub async fn pause(&self, session_id: &str) -> Result<()> {
        self.executor
            .post("/pause", json!({ "session_id": session_id }))
            .await
    }

    /// Resume a paused session.
    pub async fn resume(&self, session_id: &str) -> Result<()> {
        self.executor
            .post("/resume", json!({ "session_id": session_id }))
            .await
    }

    /// Cancel a session. The job moves to the terminal `cancelled` status.
    pub async fn cancel(&self, session_id: &str) -> Result<()> {
        self.executor
            .post("/cancel", json!({ "session_id": session_id }))
            .await
    }

    /// Request an export artifact for a session. Completion is announced
    /// over the push channel as an `export_ready` message.
    pub async fn request_export(&self, session_id: &str, format: &str) -> Result<()> {
        self.executor
            .post(
                "/export",
                json!({ "session_id": session_id, "format": format }),
            )
            .await
    }

    /// Download a finished export artifact as opaque bytes.
    pub async fn download_export(&self, export_id: &str) -> Result<bytes::Bytes> {
        self.executor
            .get_bytes(&format!("/export/{}", export_id))
            .await
    }

    // ── Ambient operations ──────────────────────────────────────────────

    /// Login with username and password to obtain an access token.
    ///
    /// The returned token can be fed back through
    /// [`AuthProvider::access_token`] for subsequent calls and for the
    /// push-channel handshake.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let url = format!("{}/auth/login", self.base_url);
        debug!("[LINK_AUTH] Authenticating user '{}' at {}", username, url);

        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self.http_client.post(&url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DocflowLinkError::AuthenticationError(format!(
                "Login failed ({}): {}",
                status, error_text
            )));
        }

        Ok(response.json::<LoginResponse>().await?)
    }

    /// Check server health. Responses are cached for a short TTL so UI
    /// status indicators can poll this cheaply.
    pub async fn health_check(&self) -> Result<HealthCheckResponse> {
        {
            let cache = self.health_cache.lock().await;
            if let (Some(last_check), Some(response)) =
                (cache.last_check, cache.last_response.clone())
            {
                if last_check.elapsed() < HEALTH_CHECK_TTL {
                    debug!(
                        "[LINK_HEALTH] Returning cached response (age: {:?})",
                        last_check.elapsed()
                    );
                    return Ok(response);
                }
            }
        }

        let url = format!("{}/health", self.base_url);
        let response = self.http_client.get(&url).send().await?;
        let health_response = response.json::<HealthCheckResponse>().await?;

        let mut cache = self.health_cache.lock().await;
        cache.last_check = Some(Instant::now());
        cache.last_response = Some(health_response.clone());

        Ok(health_response)
    }

    /// Recent per-request diagnostic records, oldest first.
    pub fn diagnostics(&self) -> Vec<CorrelationRecord> {
        self.diagnostics.snapshot()
    }

    /// The configured timeouts.
    pub fn timeouts(&self) -> &DocflowLinkTimeouts {
        &self.timeouts
    }
}

#[derive(Debug, Default)]
struct HealthCheckCache {
    last_check: Option<Instant>,
    last_response: Option<HealthCheckResponse>,
}

/// Builder for configuring [`DocflowLinkClient`] instances.
pub struct DocflowLinkClientBuilder {
    base_url: Option<String>,
    auth: AuthProvider,
    max_retries: u32,
    retry_base_delay_ms: u64,
    timeouts: DocflowLinkTimeouts,
    connection_options: ConnectionOptions,
    polling_options: PollingOptions,
    event_handlers: EventHandlers,
}

impl DocflowLinkClientBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            auth: AuthProvider::none(),
            max_retries: 3,
            retry_base_delay_ms: 1000,
            timeouts: DocflowLinkTimeouts::default(),
            connection_options: ConnectionOptions::default(),
            polling_options: PollingOptions::default(),
            event_handlers: EventHandlers::default(),
        }
    }

    /// Set the base URL for the Docflow server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set bearer-token authentication.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthProvider::access_token(token.into());
        self
    }

    /// Set the authentication provider directly.
    pub fn auth(mut self, auth: AuthProvider) -> Self {
        self.auth = auth;
        self
    }

    /// Set the maximum number of physical attempts per logical request.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay for request retry backoff (milliseconds).
    pub fn retry_base_delay_ms(mut self, delay_ms: u64) -> Self {
        self.retry_base_delay_ms = delay_ms;
        self
    }

    /// Set the timeout configuration for all operations.
    pub fn timeouts(mut self, timeouts: DocflowLinkTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set push-channel connection options (reconnect backoff, queue size).
    pub fn connection_options(mut self, options: ConnectionOptions) -> Self {
        self.connection_options = options;
        self
    }

    /// Set polling fallback options (interval, backoff, attempt caps).
    pub fn polling_options(mut self, options: PollingOptions) -> Self {
        self.polling_options = options;
        self
    }

    /// Set lifecycle event handlers.
    pub fn event_handlers(mut self, handlers: EventHandlers) -> Self {
        self.event_handlers = handlers;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<DocflowLinkClient> {
        let base_url = self
            .base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .ok_or_else(|| DocflowLinkError::ConfigurationError("base_url is required".into()))?;

        // Pooled HTTP client; keep-alive connections avoid re-handshaking
        // for every poll.
        let http_client = reqwest::Client::builder()
            .timeout(self.timeouts.request_timeout)
            .connect_timeout(self.timeouts.connection_timeout)
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| DocflowLinkError::ConfigurationError(e.to_string()))?;

        let diagnostics = Arc::new(CorrelationLog::default());
        let executor = RequestExecutor::new(
            base_url.clone(),
            http_client.clone(),
            self.auth.clone(),
            self.max_retries,
            self.retry_base_delay_ms,
            diagnostics.clone(),
        );

        Ok(DocflowLinkClient {
            base_url,
            http_client,
            auth: self.auth,
            executor,
            timeouts: self.timeouts,
            connection_options: self.connection_options,
            polling_options: self.polling_options,
            event_handlers: self.event_handlers,
            diagnostics,
            health_cache: Arc::new(Mutex::new(HealthCheckCache::default())),
        })
    }
}
