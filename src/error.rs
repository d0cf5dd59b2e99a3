//! Error types for docflow-link.

use thiserror::Error;

/// Errors produced by docflow-link operations.
#[derive(Error, Debug)]
pub enum DocflowLinkError {
    /// No response could be obtained at all (connect failure, DNS, reset).
    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    /// A request or connection attempt exceeded its deadline.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Non-retryable 4xx response (anything but 408/429).
    #[error("HTTP {status}: {message}")]
    HttpClientError {
        status: u16,
        message: String,
        correlation_id: Option<String>,
    },

    /// Retryable 5xx response, surfaced once retries are exhausted.
    #[error("HTTP {status}: {message}")]
    HttpServerError {
        status: u16,
        message: String,
        correlation_id: Option<String>,
    },

    /// Push-channel transport failure (handshake, send, frame error).
    #[error("Channel error: {0}")]
    ChannelError(String),

    /// The push channel closed unexpectedly (non-normal close code).
    #[error("Channel closed abnormally: {0}")]
    ChannelAbnormalClose(String),

    /// The server refused the push channel; terminal, never reconnected.
    #[error("Channel access denied: {0}")]
    ChannelAccessDenied(String),

    /// A malformed inbound message. Logged and skipped, never fatal to the
    /// channel.
    #[error("Failed to parse message: {0}")]
    MessageParseError(String),

    /// The polling monitor exhausted its total attempt budget.
    #[error("Polling attempt budget exhausted: {0}")]
    PollingTimeoutExceeded(String),

    /// The connection manager exhausted its reconnect attempt budget.
    #[error("Reconnect attempt limit exceeded: {0}")]
    ReconnectLimitExceeded(String),

    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type for docflow-link operations.
pub type Result<T> = std::result::Result<T, DocflowLinkError>;

/// Coarse error class, used to route classified errors to collaborators
/// without exposing every enum variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NetworkUnreachable,
    Timeout,
    HttpClientError,
    HttpServerError,
    Channel,
    ChannelAbnormalClose,
    ChannelAccessDenied,
    MessageParse,
    PollingTimeoutExceeded,
    ReconnectLimitExceeded,
    Authentication,
    Configuration,
    Serialization,
}

/// Error object handed to external collaborators (notification dispatch,
/// UI state holders) through the `on_error` hook. The library never renders
/// anything itself.
#[derive(Debug, Clone)]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub message: String,
    pub correlation_id: Option<String>,
}

impl ClassifiedError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            correlation_id: None,
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }
}

impl std::fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.correlation_id {
            Some(id) => write!(f, "{:?}: {} (correlation_id={})", self.kind, self.message, id),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl DocflowLinkError {
    /// The coarse class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NetworkUnreachable(_) => ErrorKind::NetworkUnreachable,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::HttpClientError { .. } => ErrorKind::HttpClientError,
            Self::HttpServerError { .. } => ErrorKind::HttpServerError,
            Self::ChannelError(_) => ErrorKind::Channel,
            Self::ChannelAbnormalClose(_) => ErrorKind::ChannelAbnormalClose,
            Self::ChannelAccessDenied(_) => ErrorKind::ChannelAccessDenied,
            Self::MessageParseError(_) => ErrorKind::MessageParse,
            Self::PollingTimeoutExceeded(_) => ErrorKind::PollingTimeoutExceeded,
            Self::ReconnectLimitExceeded(_) => ErrorKind::ReconnectLimitExceeded,
            Self::AuthenticationError(_) => ErrorKind::Authentication,
            Self::ConfigurationError(_) => ErrorKind::Configuration,
            Self::SerializationError(_) => ErrorKind::Serialization,
        }
    }

    /// Correlation id attached to this error, if any.
    pub fn correlation_id(&self) -> Option<&str> {
        match self {
            Self::HttpClientError { correlation_id, .. }
            | Self::HttpServerError { correlation_id, .. } => correlation_id.as_deref(),
            _ => None,
        }
    }

    /// Convert into the classified form handed to collaborators.
    pub fn classify(&self) -> ClassifiedError {
        ClassifiedError {
            kind: self.kind(),
            message: self.to_string(),
            correlation_id: self.correlation_id().map(|s| s.to_string()),
        }
    }
}

impl From<reqwest::Error> for DocflowLinkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::NetworkUnreachable(err.to_string())
        } else if err.is_decode() {
            Self::SerializationError(err.to_string())
        } else {
            Self::NetworkUnreachable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DocflowLinkError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let err = DocflowLinkError::HttpServerError {
            status: 503,
            message: "unavailable".to_string(),
            correlation_id: Some("corr-1".to_string()),
        };
        assert_eq!(err.kind(), ErrorKind::HttpServerError);
        assert_eq!(err.correlation_id(), Some("corr-1"));
    }

    #[test]
    fn test_classify_carries_correlation_id() {
        let err = DocflowLinkError::HttpClientError {
            status: 400,
            message: "bad request".to_string(),
            correlation_id: Some("corr-2".to_string()),
        };
        let classified = err.classify();
        assert_eq!(classified.kind, ErrorKind::HttpClientError);
        assert_eq!(classified.correlation_id.as_deref(), Some("corr-2"));
    }

    #[test]
    fn test_classify_without_correlation_id() {
        let classified = DocflowLinkError::Timeout("10s".to_string()).classify();
        assert_eq!(classified.kind, ErrorKind::Timeout);
        assert!(classified.correlation_id.is_none());
    }
}
