//! Response types for the HTTP API.

use hook_harbor_core::{RoutingOutcome, Timestamp};
use serde::Serialize;

// ============================================================================
// Response Types
// ============================================================================

/// Webhook acknowledgement body
///
/// Confirms receipt and processing to the upstream sender. `status` is
/// always `"success"` on a 200: an unhandled event type and a contained
/// handler failure both acknowledge the delivery, with the distinction
/// carried in `outcome`.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub status: String,
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installation_id: Option<String>,
}

impl WebhookAck {
    /// Build an acknowledgement from a routing outcome
    pub fn from_outcome(outcome: &RoutingOutcome) -> Self {
        let (event_type, installation_id) = match outcome {
            RoutingOutcome::Handled { event_type }
            | RoutingOutcome::Unhandled { event_type }
            | RoutingOutcome::Failed { event_type, .. } => {
                (Some(event_type.as_str().to_string()), None)
            }
            RoutingOutcome::Installed { installation_id }
            | RoutingOutcome::Uninstalled { installation_id } => {
                (None, Some(installation_id.as_str().to_string()))
            }
        };

        Self {
            status: "success".to_string(),
            outcome: outcome.as_str().to_string(),
            event_type,
            installation_id,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: Timestamp,
}

impl HealthResponse {
    /// The fixed healthy body
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            service: "hook-harbor".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Timestamp::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub timestamp: Timestamp,
}

#[cfg(test)]
#[path = "responses_tests.rs"]
mod tests;
