//! # Event Dispatch Pipeline
//!
//! Carries a raw inbound delivery through the full pipeline:
//!
//! 1. Signature verification over the raw body bytes
//! 2. Payload parsing into an [`EventEnvelope`]
//! 3. Lifecycle short-circuit for `INSTALL` / `UNINSTALL`
//! 4. Registry lookup and timed handler invocation
//!
//! Every verified event is routed at most once to at most one handler.
//! An unregistered event type is acknowledged and logged, never rejected:
//! an error response would lead the upstream sender to retry indefinitely
//! for event types this receiver intentionally does not process. Handler
//! failures and timeouts are likewise contained per event and surfaced in
//! the [`RoutingOutcome`] rather than the request result.

use crate::credentials::{CredentialStore, CredentialStoreError};
use crate::event::{MalformedPayloadError, WebhookRequest};
use crate::lifecycle::{LifecycleError, LifecycleHooks, INSTALL_EVENT, UNINSTALL_EVENT};
use crate::registry::HandlerRegistry;
use crate::signature::{AuthenticationError, SignatureVerifier};
use crate::{EventType, InstallationId};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument};

// ============================================================================
// Core Types
// ============================================================================

/// What became of a verified, well-formed event
///
/// All variants acknowledge the delivery; the distinction exists for
/// logging, the acknowledgement body, and tests.
#[derive(Debug)]
pub enum RoutingOutcome {
    /// A registered handler processed the event successfully.
    Handled { event_type: EventType },

    /// No handler is registered for the event type; explicit no-op.
    Unhandled { event_type: EventType },

    /// The matched handler failed or timed out; contained, not propagated.
    Failed {
        event_type: EventType,
        error: HandlerExecutionError,
    },

    /// An `INSTALL` event provisioned a credential.
    Installed { installation_id: InstallationId },

    /// An `UNINSTALL` event revoked a credential.
    Uninstalled { installation_id: InstallationId },
}

impl RoutingOutcome {
    /// Short label for logs and acknowledgement bodies
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Handled { .. } => "handled",
            Self::Unhandled { .. } => "unhandled",
            Self::Failed { .. } => "failed",
            Self::Installed { .. } => "installed",
            Self::Uninstalled { .. } => "uninstalled",
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// A failure raised while a specific handler ran
///
/// Reported to the observability boundary (error logs, routing outcome)
/// without aborting the request.
#[derive(Debug, thiserror::Error)]
pub enum HandlerExecutionError {
    #[error("Handler for '{event_type}' failed: {source}")]
    Failed {
        event_type: EventType,
        #[source]
        source: anyhow::Error,
    },

    #[error("Handler for '{event_type}' timed out after {timeout:?}")]
    TimedOut {
        event_type: EventType,
        timeout: Duration,
    },
}

/// Top-level error for dispatch failures
///
/// These are the failures that abort the request with an error response;
/// handler-level failures never appear here.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Authentication failed: {0}")]
    Authentication(#[from] AuthenticationError),

    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] MalformedPayloadError),

    #[error("Credential store failure: {0}")]
    CredentialStore(#[from] CredentialStoreError),
}

impl From<LifecycleError> for DispatchError {
    fn from(error: LifecycleError) -> Self {
        match error {
            LifecycleError::Payload(e) => Self::MalformedPayload(e),
            LifecycleError::Store(e) => Self::CredentialStore(e),
        }
    }
}

impl DispatchError {
    /// Check if the failure is transient and the sender should redeliver
    pub fn is_transient(&self) -> bool {
        match self {
            Self::CredentialStore(e) => e.is_transient(),
            Self::Authentication(_) => false,
            Self::MalformedPayload(_) => false,
        }
    }
}

// ============================================================================
// EventDispatcher
// ============================================================================

/// The webhook ingestion dispatcher
///
/// Holds the read-only collaborators for the pipeline; one instance serves
/// all concurrent requests. Per-event state lives on the call stack.
pub struct EventDispatcher {
    verifier: Arc<dyn SignatureVerifier>,
    registry: Arc<HandlerRegistry>,
    lifecycle: LifecycleHooks,
    handler_timeout: Duration,
}

impl EventDispatcher {
    /// Create a dispatcher from its collaborators
    ///
    /// `handler_timeout` bounds each handler invocation so a single slow
    /// external call cannot stall the endpoint indefinitely.
    pub fn new(
        verifier: Arc<dyn SignatureVerifier>,
        registry: Arc<HandlerRegistry>,
        store: Arc<dyn CredentialStore>,
        handler_timeout: Duration,
    ) -> Self {
        Self {
            verifier,
            registry,
            lifecycle: LifecycleHooks::new(store),
            handler_timeout,
        }
    }

    /// Process one inbound delivery through the full pipeline
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Authentication`] when the signature is
    /// absent or invalid, [`DispatchError::MalformedPayload`] when the body
    /// cannot be parsed, and [`DispatchError::CredentialStore`] when a
    /// lifecycle event's persistence fails. Handler failures do not error;
    /// they are reported in the returned [`RoutingOutcome`].
    #[instrument(skip(self, request), fields(body_len = request.body.len()))]
    pub async fn dispatch(&self, request: WebhookRequest) -> Result<RoutingOutcome, DispatchError> {
        // 1. Authenticate the raw bytes before parsing anything.
        let signature = request
            .signature()
            .ok_or(AuthenticationError::MissingSignature)?;
        self.verifier.verify(&request.body, signature).await?;

        // 2. Parse the envelope.
        let envelope = request.parse()?;

        info!(
            event_id = %envelope.event_id,
            correlation_id = %envelope.correlation_id,
            event_type = %envelope.event_type,
            "Processing verified event"
        );

        // 3. Lifecycle events run before generic routing; they gate whether
        //    later events for the installation can be authenticated at all.
        match envelope.event_type.as_str() {
            INSTALL_EVENT => {
                let installation_id = self.lifecycle.handle_install(&envelope).await?;
                return Ok(RoutingOutcome::Installed { installation_id });
            }
            UNINSTALL_EVENT => {
                let installation_id = self.lifecycle.handle_uninstall(&envelope).await?;
                return Ok(RoutingOutcome::Uninstalled { installation_id });
            }
            _ => {}
        }

        // 4. Route through the registry.
        let Some(handler) = self.registry.get(&envelope.event_type) else {
            info!(
                event_id = %envelope.event_id,
                event_type = %envelope.event_type,
                "No handler registered; acknowledging without dispatch"
            );
            return Ok(RoutingOutcome::Unhandled {
                event_type: envelope.event_type,
            });
        };

        match tokio::time::timeout(self.handler_timeout, handler.handle(&envelope)).await {
            Ok(Ok(())) => {
                info!(
                    event_id = %envelope.event_id,
                    event_type = %envelope.event_type,
                    "Event handled"
                );
                Ok(RoutingOutcome::Handled {
                    event_type: envelope.event_type,
                })
            }
            Ok(Err(source)) => {
                let error = HandlerExecutionError::Failed {
                    event_type: envelope.event_type.clone(),
                    source,
                };
                error!(
                    event_id = %envelope.event_id,
                    event_type = %envelope.event_type,
                    error = %error,
                    "Handler failed; delivery still acknowledged"
                );
                Ok(RoutingOutcome::Failed {
                    event_type: envelope.event_type,
                    error,
                })
            }
            Err(_) => {
                let error = HandlerExecutionError::TimedOut {
                    event_type: envelope.event_type.clone(),
                    timeout: self.handler_timeout,
                };
                error!(
                    event_id = %envelope.event_id,
                    event_type = %envelope.event_type,
                    timeout_ms = self.handler_timeout.as_millis() as u64,
                    "Handler timed out; delivery still acknowledged"
                );
                Ok(RoutingOutcome::Failed {
                    event_type: envelope.event_type,
                    error,
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
