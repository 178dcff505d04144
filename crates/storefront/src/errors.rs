use serde::Deserialize;
use thiserror::Error;

/// Failure surfaced by a [`DocumentStore`](crate::store::DocumentStore).
///
/// Nothing distinguishes transient from permanent failures; callers treat
/// every variant as final.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Quota exceeded: {0}")]
    ResourceExhausted(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Document already exists: {0}")]
    AlreadyExists(String),

    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Credential error: {0}")]
    Credentials(String),

    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Google API error envelope: `{"error": {"code", "message", "status"}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl StoreError {
    /// Maps a non-success HTTP response body onto a store error.
    ///
    /// Falls back to [`StoreError::Rejected`] with the raw body when the
    /// envelope cannot be decoded or names an unmapped status.
    pub fn from_response(status: u16, body: &str) -> Self {
        let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) else {
            return StoreError::Rejected {
                status,
                message: body.to_string(),
            };
        };

        let message = envelope.error.message;
        match envelope.error.status.as_str() {
            "UNAUTHENTICATED" => StoreError::Unauthenticated(message),
            "PERMISSION_DENIED" => StoreError::PermissionDenied(message),
            "RESOURCE_EXHAUSTED" => StoreError::ResourceExhausted(message),
            "INVALID_ARGUMENT" | "FAILED_PRECONDITION" => StoreError::InvalidArgument(message),
            "ALREADY_EXISTS" => StoreError::AlreadyExists(message),
            _ => StoreError::Rejected { status, message },
        }
    }
}
