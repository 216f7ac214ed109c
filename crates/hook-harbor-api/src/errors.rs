//! Error types for the HTTP service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use hook_harbor_core::{DispatchError, ValidationError};
use tracing::{error, warn};

/// Webhook handler errors with HTTP status code mapping
///
/// Maps processing failures to status codes following the acknowledgement
/// contract of the dispatch pipeline:
///
/// - `401 Unauthorized`: signature missing, malformed, or mismatched
///   (rejected before routing).
/// - `400 Bad Request`: headers or body not parseable as an event
///   (permanent; the sender must not retry).
/// - `503 Service Unavailable`: credential store failure during a lifecycle
///   event. The sender must redeliver, so a `Retry-After` header is
///   attached.
/// - `500 Internal Server Error`: unexpected server failure.
///
/// Handler-level failures never appear here: they are contained inside the
/// dispatch pipeline and acknowledged with 200.
///
/// # Security Considerations
///
/// Error messages returned to clients are sanitized. Detailed error
/// information is logged server-side with correlation IDs.
#[derive(Debug, thiserror::Error)]
pub enum WebhookHandlerError {
    /// Invalid HTTP headers (wrong content type, undecodable values)
    ///
    /// Maps to: `400 Bad Request` (permanent error, do not retry)
    #[error("Invalid headers: {0}")]
    InvalidHeaders(#[from] ValidationError),

    /// Dispatch pipeline failure
    ///
    /// Maps to:
    /// - `401 Unauthorized` for authentication failures
    /// - `400 Bad Request` for malformed payloads
    /// - `503 Service Unavailable` for credential store failures
    #[error("Dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),

    /// Unexpected internal server error
    ///
    /// Maps to: `500 Internal Server Error`. Details are logged but a
    /// generic message is returned to the client.
    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl IntoResponse for WebhookHandlerError {
    fn into_response(self) -> Response {
        let (status, message, retry_after) = match self {
            Self::InvalidHeaders(_) => (StatusCode::BAD_REQUEST, self.to_string(), None),
            Self::Dispatch(ref e) => match e {
                DispatchError::Authentication(_) => {
                    warn!(error = %e, "Rejecting delivery with failed authentication");
                    (StatusCode::UNAUTHORIZED, self.to_string(), None)
                }
                DispatchError::MalformedPayload(_) => {
                    (StatusCode::BAD_REQUEST, self.to_string(), None)
                }
                DispatchError::CredentialStore(_) => {
                    error!(error = %e, "Credential store failure; sender must redeliver");
                    (StatusCode::SERVICE_UNAVAILABLE, self.to_string(), Some(60))
                }
            },
            Self::Internal { ref message } => {
                error!(error = %message, "Internal server error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error occurred. Please try again later.".to_string(),
                    None,
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let mut response = (status, Json(body)).into_response();

        if let Some(retry_seconds) = retry_after {
            if let Ok(header_value) = retry_seconds.to_string().parse() {
                response.headers_mut().insert("Retry-After", header_value);
            }
        }

        response
    }
}

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("Server failed: {message}")]
    ServerFailed { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] crate::config::ConfigError),
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
