//! Retrying HTTP request executor.
//!
//! Every outbound HTTP call goes through here: authentication headers and a
//! fresh correlation id are injected, transient failures are retried with
//! exponential backoff, and each physical attempt is recorded in the
//! diagnostics ring buffer. The correlation id is stable across the retries
//! of one logical call so server and client logs line up.

use crate::{
    auth::AuthProvider,
    backoff::BackoffPolicy,
    correlation::{new_correlation_id, CorrelationLog, CorrelationRecord},
    error::{DocflowLinkError, Result},
};
use log::{debug, warn};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Instant;

/// Statuses worth retrying: request timeout, rate limiting, and the
/// transient 5xx family.
const RETRYABLE_STATUSES: [u16; 6] = [408, 429, 500, 502, 503, 504];

pub(crate) fn is_retryable_status(status: u16) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}

/// Executes HTTP requests with auth, correlation ids, and retry/backoff.
#[derive(Clone)]
pub struct RequestExecutor {
    base_url: String,
    http_client: reqwest::Client,
    auth: AuthProvider,
    max_attempts: u32,
    backoff: BackoffPolicy,
    diagnostics: Arc<CorrelationLog>,
}

impl RequestExecutor {
    pub(crate) fn new(
        base_url: String,
        http_client: reqwest::Client,
        auth: AuthProvider,
        max_attempts: u32,
        retry_base_delay_ms: u64,
        diagnostics: Arc<CorrelationLog>,
    ) -> Self {
        Self {
            base_url,
            http_client,
            auth,
            max_attempts: max_attempts.max(1),
            backoff: BackoffPolicy::request_retry(retry_base_delay_ms),
            diagnostics,
        }
    }

    /// Execute one logical request, retrying transient failures.
    ///
    /// At most `max_attempts` physical requests are issued. Network-level
    /// failures (connect errors, timeouts) and retryable statuses back off
    /// with `base * 2^(attempt-1)`. Non-retryable statuses fail immediately
    /// with a classified error carrying the correlation id.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<JsonValue>,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let correlation_id = new_correlation_id();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            // Build the request fresh on each attempt (builders with bodies
            // cannot be cloned).
            let mut req_builder = self
                .http_client
                .request(method.clone(), &url)
                .header("x-correlation-id", &correlation_id)
                .header("x-request-id", &correlation_id);
            if let Some(ref json) = body {
                req_builder = req_builder.json(json);
            }
            req_builder = self.auth.apply_to_request(req_builder)?;

            let attempt_start = Instant::now();
            debug!(
                "[LINK_HTTP] {} {} (attempt {}/{}, correlation_id={})",
                method, url, attempt, self.max_attempts, correlation_id
            );

            match req_builder.send().await {
                Ok(response) => {
                    let duration_ms = attempt_start.elapsed().as_millis() as u64;
                    let status = response.status();

                    if status.is_success() {
                        debug!(
                            "[LINK_HTTP] Response: status={} duration_ms={}",
                            status, duration_ms
                        );
                        self.record_attempt(path, &method, &correlation_id, Some(status.as_u16()), duration_ms, true, None);
                        return Ok(response);
                    }

                    let code = status.as_u16();
                    let message = Self::read_error_message(response).await;
                    self.record_attempt(
                        path,
                        &method,
                        &correlation_id,
                        Some(code),
                        duration_ms,
                        false,
                        Some(message.clone()),
                    );

                    if is_retryable_status(code) && attempt < self.max_attempts {
                        let delay = self.backoff.delay_for_attempt(attempt);
                        warn!(
                            "[LINK_HTTP] Retryable status {} (attempt {}/{}), retrying in {:?}",
                            code, attempt, self.max_attempts, delay
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    warn!(
                        "[LINK_HTTP] Request failed: status={} message=\"{}\" correlation_id={}",
                        code, message, correlation_id
                    );
                    return Err(Self::classify_status(code, message, &correlation_id));
                },
                Err(e) => {
                    let duration_ms = attempt_start.elapsed().as_millis() as u64;
                    self.record_attempt(
                        path,
                        &method,
                        &correlation_id,
                        None,
                        duration_ms,
                        false,
                        Some(e.to_string()),
                    );

                    if Self::is_retryable_transport(&e) && attempt < self.max_attempts {
                        let delay = self.backoff.delay_for_attempt(attempt);
                        warn!(
                            "[LINK_HTTP] Transport error (attempt {}/{}): {}, retrying in {:?}",
                            attempt, self.max_attempts, e, delay
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    warn!(
                        "[LINK_HTTP] Request failed: {} correlation_id={}",
                        e, correlation_id
                    );
                    return Err(e.into());
                },
            }
        }
    }

    /// GET a JSON-typed response.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.execute(Method::GET, path, None).await?;
        Ok(response.json::<T>().await?)
    }

    /// POST a JSON body, expect a JSON-typed response.
    pub async fn post_json<T: DeserializeOwned>(&self, path: &str, body: JsonValue) -> Result<T> {
        let response = self.execute(Method::POST, path, Some(body)).await?;
        Ok(response.json::<T>().await?)
    }

    /// POST a JSON body, ignore the response payload.
    pub async fn post(&self, path: &str, body: JsonValue) -> Result<()> {
        self.execute(Method::POST, path, Some(body)).await?;
        Ok(())
    }

    /// GET an opaque binary artifact (export downloads). Non-JSON responses
    /// pass through untouched.
    pub async fn get_bytes(&self, path: &str) -> Result<bytes::Bytes> {
        let response = self.execute(Method::GET, path, None).await?;
        Ok(response.bytes().await?)
    }

    fn is_retryable_transport(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    fn classify_status(status: u16, message: String, correlation_id: &str) -> DocflowLinkError {
        if status >= 500 {
            DocflowLinkError::HttpServerError {
                status,
                message,
                correlation_id: Some(correlation_id.to_string()),
            }
        } else {
            DocflowLinkError::HttpClientError {
                status,
                message,
                correlation_id: Some(correlation_id.to_string()),
            }
        }
    }

    /// Pull a human-readable message out of an error response body.
    async fn read_error_message(response: reqwest::Response) -> String {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if text.is_empty() {
            return status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string();
        }
        // Prefer a structured { "message": ... } body when the server sends one.
        match serde_json::from_str::<JsonValue>(&text) {
            Ok(json) => json
                .get("message")
                .and_then(|m| m.as_str())
                .map(|s| s.to_string())
                .unwrap_or(text),
            Err(_) => text,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn record_attempt(
        &self,
        endpoint: &str,
        method: &Method,
        correlation_id: &str,
        status: Option<u16>,
        duration_ms: u64,
        success: bool,
        error: Option<String>,
    ) {
        self.diagnostics.record(CorrelationRecord {
            correlation_id: correlation_id.to_string(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
            status,
            duration_ms,
            success,
            error,
        });
    }
}
