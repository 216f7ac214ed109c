//! # Inbound Event Model
//!
//! Types describing an inbound webhook delivery at its three stages of life:
//! the raw HTTP request ([`WebhookRequest`]), its relevant headers
//! ([`WebhookHeaders`]), and the parsed envelope ([`EventEnvelope`]) handed
//! to handlers.
//!
//! Parsing is deliberately split from receipt: signature verification
//! operates on the raw body bytes of a [`WebhookRequest`], and only after it
//! succeeds is the body parsed into an [`EventEnvelope`]. Verifying a
//! re-serialized payload would be incorrect because re-serialization is not
//! guaranteed to be byte-identical to the original.

use crate::{CorrelationId, EventId, EventType, InstallationId, Timestamp, ValidationError};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "x-wh-signature";

// ============================================================================
// Core Types
// ============================================================================

/// Raw HTTP request data for an inbound webhook delivery
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    pub headers: WebhookHeaders,
    pub body: Bytes,
    pub received_at: Timestamp,
}

impl WebhookRequest {
    /// Create new webhook request
    pub fn new(headers: WebhookHeaders, body: Bytes) -> Self {
        Self {
            headers,
            body,
            received_at: Timestamp::now(),
        }
    }

    /// Get signature from headers if present
    pub fn signature(&self) -> Option<&str> {
        self.headers.signature.as_deref()
    }

    /// Parse the raw body into an [`EventEnvelope`]
    ///
    /// Must only be called after signature verification has passed; the raw
    /// bytes, not the parsed value, are the unit of authentication.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedPayloadError`] when the body is not valid JSON,
    /// is missing the `type` discriminant, or carries an invalid
    /// discriminant value.
    pub fn parse(&self) -> Result<EventEnvelope, MalformedPayloadError> {
        let value: serde_json::Value = serde_json::from_slice(&self.body)?;

        let event_type = value
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or_else(|| MalformedPayloadError::MissingField {
                field: "type".to_string(),
            })?;

        let event_type =
            EventType::new(event_type).map_err(|source| MalformedPayloadError::InvalidField {
                field: "type".to_string(),
                source,
            })?;

        // The `data` object is opaque to the core; handlers interpret it.
        // Events without a `data` member (notably lifecycle events, which
        // carry their fields at the top level) fall back to the whole body.
        let payload = value.get("data").cloned().unwrap_or_else(|| value.clone());

        let installation = extract_installation_id(&value);

        Ok(EventEnvelope {
            event_id: EventId::new(),
            correlation_id: CorrelationId::new(),
            event_type,
            installation,
            payload,
            received_at: self.received_at,
        })
    }
}

/// HTTP headers relevant to webhook processing
#[derive(Debug, Clone)]
pub struct WebhookHeaders {
    pub signature: Option<String>, // x-wh-signature
    pub content_type: String,      // Content-Type
}

impl WebhookHeaders {
    /// Parse headers from a lowercased HTTP header map
    pub fn from_http_headers(headers: &HashMap<String, String>) -> Result<Self, ValidationError> {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .or_else(|| headers.get("X-Wh-Signature"))
            .cloned();

        let content_type = headers
            .get("content-type")
            .or_else(|| headers.get("Content-Type"))
            .cloned()
            .unwrap_or_else(|| "application/json".to_string());

        let headers = Self {
            signature,
            content_type,
        };

        headers.validate()?;
        Ok(headers)
    }

    /// Validate header values
    ///
    /// Signature presence is checked later, in the dispatcher, so that its
    /// absence surfaces as an authentication failure rather than a generic
    /// header validation error.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.content_type.starts_with("application/json") {
            return Err(ValidationError::InvalidFormat {
                field: "content_type".to_string(),
                message: "must be application/json".to_string(),
            });
        }

        Ok(())
    }
}

/// Parsed event structure handed to lifecycle hooks and handlers
///
/// The `payload` is the event's `data` object, opaque to the core; the
/// remaining fields are routing and logging metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: EventId,
    pub correlation_id: CorrelationId,
    pub event_type: EventType,
    pub installation: Option<InstallationId>,
    pub payload: serde_json::Value,
    pub received_at: Timestamp,
}

/// Extract the installation identifier from a payload, if present
///
/// The upstream platform is inconsistent about the field name across event
/// shapes: `installationId` on lifecycle events, `locationId` on most
/// resource events, `companyId` on agency-level events. Checked in that
/// order, at the top level first and inside `data` second.
fn extract_installation_id(value: &serde_json::Value) -> Option<InstallationId> {
    const FIELDS: [&str; 3] = ["installationId", "locationId", "companyId"];

    let lookup = |obj: &serde_json::Value| {
        FIELDS
            .iter()
            .find_map(|f| obj.get(f).and_then(|v| v.as_str()).map(str::to_string))
    };

    lookup(value)
        .or_else(|| value.get("data").and_then(|d| lookup(d)))
        .and_then(|raw| InstallationId::new(raw).ok())
}

// ============================================================================
// Error Types
// ============================================================================

/// The request body could not be parsed as an event
///
/// Rejected before routing; maps to a 400 response at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum MalformedPayloadError {
    #[error("Body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid field '{field}': {source}")]
    InvalidField {
        field: String,
        source: ValidationError,
    },
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
