//! # Lifecycle Hooks
//!
//! Handling for the two reserved event types that bracket a tenant's use of
//! the integration: `INSTALL` provisions the installation's credential in
//! the external store, `UNINSTALL` revokes it.
//!
//! Both operations run before generic routing because they affect whether
//! subsequent events for that installation can be authenticated at all.
//! Both are idempotent: redelivery of an install upserts by installation
//! identifier, and uninstalling an absent installation succeeds.

use crate::credentials::{AccessToken, Credential, CredentialStore, CredentialStoreError};
use crate::event::{EventEnvelope, MalformedPayloadError};
use crate::{EventType, InstallationId};
use std::sync::Arc;
use tracing::{info, instrument};

/// Reserved event type marking an integration install.
pub const INSTALL_EVENT: &str = "INSTALL";

/// Reserved event type marking an integration uninstall.
pub const UNINSTALL_EVENT: &str = "UNINSTALL";

/// Whether an event type is one of the reserved lifecycle types
pub fn is_lifecycle_event(event_type: &EventType) -> bool {
    matches!(event_type.as_str(), INSTALL_EVENT | UNINSTALL_EVENT)
}

// ============================================================================
// Error Types
// ============================================================================

/// Failure while handling a lifecycle event
///
/// Unlike generic handler failures, these are reported to the caller as
/// request failures: a swallowed credential write would corrupt future
/// authentication for the installation.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("Lifecycle payload invalid: {0}")]
    Payload(#[from] MalformedPayloadError),

    #[error("Credential store failure: {0}")]
    Store(#[from] CredentialStoreError),
}

// ============================================================================
// LifecycleHooks
// ============================================================================

/// Install/uninstall handling bound to a credential store
pub struct LifecycleHooks {
    store: Arc<dyn CredentialStore>,
}

impl LifecycleHooks {
    /// Create hooks writing to the given store
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Handle an `INSTALL` event
    ///
    /// Extracts the installation identifier and token material from the
    /// payload and upserts the credential record. Redelivery of the same
    /// install event replaces the record rather than duplicating it.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Payload`] when the identifier or access
    /// token is missing, and [`LifecycleError::Store`] when persistence
    /// fails.
    #[instrument(skip(self, envelope), fields(event_id = %envelope.event_id))]
    pub async fn handle_install(
        &self,
        envelope: &EventEnvelope,
    ) -> Result<InstallationId, LifecycleError> {
        let installation_id = require_installation_id(envelope)?;

        let access_token = envelope
            .payload
            .get("accessToken")
            .and_then(|t| t.as_str())
            .map(AccessToken::new)
            .ok_or_else(|| MalformedPayloadError::MissingField {
                field: "accessToken".to_string(),
            })?;

        let refresh_token = envelope
            .payload
            .get("refreshToken")
            .and_then(|t| t.as_str())
            .map(AccessToken::new);

        let expires_at = envelope
            .payload
            .get("expiresIn")
            .and_then(|e| e.as_u64())
            .map(|seconds| envelope.received_at.add_seconds(seconds));

        let credential = Credential::new(
            installation_id.clone(),
            access_token,
            refresh_token,
            expires_at,
        );

        self.store.put(credential).await?;

        info!(
            installation_id = %installation_id,
            "Installation credential stored"
        );

        Ok(installation_id)
    }

    /// Handle an `UNINSTALL` event
    ///
    /// Removes the installation's credential. Removing an installation with
    /// no stored credential is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Payload`] when the installation identifier
    /// is missing, and [`LifecycleError::Store`] when removal fails.
    #[instrument(skip(self, envelope), fields(event_id = %envelope.event_id))]
    pub async fn handle_uninstall(
        &self,
        envelope: &EventEnvelope,
    ) -> Result<InstallationId, LifecycleError> {
        let installation_id = require_installation_id(envelope)?;

        self.store.remove(&installation_id).await?;

        info!(
            installation_id = %installation_id,
            "Installation credential removed"
        );

        Ok(installation_id)
    }
}

/// Installation identifier from the envelope, required for lifecycle events
fn require_installation_id(
    envelope: &EventEnvelope,
) -> Result<InstallationId, MalformedPayloadError> {
    envelope
        .installation
        .clone()
        .ok_or_else(|| MalformedPayloadError::MissingField {
            field: "installationId".to_string(),
        })
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
