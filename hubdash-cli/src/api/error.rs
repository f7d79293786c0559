use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// API-specific errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timed out after {:?}", .0)]
    Timeout(Duration),

    #[error("Failed to decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ApiError {
    pub fn from_status(status: StatusCode, message: String) -> Self {
        let msg = if message.is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            message
        };

        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(msg),
            StatusCode::FORBIDDEN => ApiError::Unauthorized(msg),
            StatusCode::NOT_FOUND => ApiError::NotFound(msg),
            StatusCode::BAD_REQUEST => ApiError::BadRequest(msg),
            status if status.is_server_error() => ApiError::ServerError(msg),
            status if status.is_client_error() => ApiError::BadRequest(msg),
            _ => ApiError::Unknown(msg),
        }
    }

    pub fn decode(what: &'static str, reason: impl ToString) -> Self {
        ApiError::Decode {
            what,
            reason: reason.to_string(),
        }
    }

    /// Classify a failure to read `what` from a response body: malformed
    /// payloads are decode errors, interrupted transfers are network errors.
    pub fn from_body(what: &'static str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::decode(what, err)
        } else {
            ApiError::NetworkError(err.to_string())
        }
    }

    /// Short category used in on-screen error reports
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "auth",
            ApiError::NotFound(_) | ApiError::BadRequest(_) => "request",
            ApiError::ServerError(_) => "server",
            ApiError::NetworkError(_) => "network",
            ApiError::Timeout(_) => "timeout",
            ApiError::Decode { .. } => "decode",
            ApiError::Unknown(_) => "unknown",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::from_body("response", err)
    }
}
