use serde::{Deserialize, Serialize};

/// Response body for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests and the push-channel handshake.
    pub access_token: String,
    /// Token lifetime in seconds, when the server reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}
