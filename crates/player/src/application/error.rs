//! Client-side error classification.

use lifesys_shared::ErrorBody;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Could not encode request: {0}")]
    Encode(String),
    #[error("Invalid response: {0}")]
    Decode(String),
    #[error("Not logged in")]
    NotLoggedIn,
}

impl ClientError {
    /// Classifies a non-2xx answer. The server's `ErrorBody.message` is used
    /// when the body parses, the raw text otherwise.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.message)
            .unwrap_or_else(|_| body.trim().to_string());
        match status {
            401 => ClientError::Unauthorized(message),
            404 => ClientError::NotFound(message),
            409 => ClientError::Conflict(message),
            400..=499 => ClientError::Rejected { status, message },
            _ => ClientError::Server { status, message },
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ClientError::Conflict(_))
    }
}
