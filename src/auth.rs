//! Authentication provider for the Docflow client.
//!
//! Attaches the appropriate Authorization header to HTTP requests and to the
//! push-channel handshake.

use crate::error::{DocflowLinkError, Result};
use base64::{engine::general_purpose, Engine as _};
use tokio_tungstenite::tungstenite::http::header::{HeaderValue, AUTHORIZATION};

/// Authentication credentials for the Docflow server.
///
/// # Examples
///
/// ```rust
/// use docflow_link::AuthProvider;
///
/// // HTTP Basic Auth
/// let auth = AuthProvider::basic_auth("alice".to_string(), "secret".to_string());
///
/// // Bearer access token (obtained via login)
/// let auth = AuthProvider::access_token("eyJhbGc...".to_string());
///
/// // No authentication (localhost bypass mode)
/// let auth = AuthProvider::none();
/// ```
#[derive(Debug, Clone)]
pub enum AuthProvider {
    /// HTTP Basic Auth (username, password)
    BasicAuth(String, String),

    /// Bearer access token
    AccessToken(String),

    /// No authentication (localhost bypass)
    None,
}

impl AuthProvider {
    /// Create HTTP Basic Auth credentials.
    ///
    /// Encodes username:password as base64 for the Authorization: Basic
    /// header following RFC 7617.
    pub fn basic_auth(username: String, password: String) -> Self {
        Self::BasicAuth(username, password)
    }

    /// Create bearer-token authentication.
    pub fn access_token(token: String) -> Self {
        Self::AccessToken(token)
    }

    /// No authentication (for localhost bypass mode).
    pub fn none() -> Self {
        Self::None
    }

    /// Attach authentication headers to an HTTP request builder.
    pub fn apply_to_request(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder> {
        match self {
            Self::BasicAuth(username, password) => {
                let credentials = format!("{}:{}", username, password);
                let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
                Ok(request.header("Authorization", format!("Basic {}", encoded)))
            },
            Self::AccessToken(token) => Ok(request.bearer_auth(token)),
            Self::None => Ok(request),
        }
    }

    /// Attach authentication headers to a push-channel handshake request.
    ///
    /// The channel endpoint only accepts bearer tokens; Basic credentials
    /// must be exchanged for a token via `login()` first.
    pub fn apply_to_channel_request(
        &self,
        request: &mut tokio_tungstenite::tungstenite::http::Request<()>,
    ) -> Result<()> {
        match self {
            Self::BasicAuth(_, _) => Err(DocflowLinkError::AuthenticationError(
                "Push channel requires an access token. Use AuthProvider::access_token or login first."
                    .to_string(),
            )),
            Self::AccessToken(token) => {
                let value = format!("Bearer {}", token);
                let header_value = HeaderValue::from_str(&value).map_err(|e| {
                    DocflowLinkError::ConfigurationError(format!(
                        "Invalid access token for Authorization header: {}",
                        e
                    ))
                })?;
                request.headers_mut().insert(AUTHORIZATION, header_value);
                Ok(())
            },
            Self::None => Ok(()),
        }
    }

    /// Check if authentication is configured.
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::None)
    }
}
