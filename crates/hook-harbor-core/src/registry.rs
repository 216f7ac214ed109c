//! # Handler Registry
//!
//! A write-once mapping from event type to asynchronous handler.
//!
//! The registry is populated at process startup and then shared read-only
//! behind an `Arc`; concurrent request handling requires no synchronization
//! because the map is never mutated after startup. Exactly one handler is
//! allowed per event type: duplicate registration is rejected so a
//! misconfigured startup fails fast instead of silently overriding a
//! handler.

use crate::event::EventEnvelope;
use crate::lifecycle::is_lifecycle_event;
use crate::EventType;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

// ============================================================================
// Core Operations (Traits)
// ============================================================================

/// Interface for application event handlers
///
/// Handlers receive the parsed envelope after signature verification and
/// routing. They may suspend for further I/O; the dispatcher awaits
/// completion (bounded by the configured timeout) before the request is
/// acknowledged, so a handler's result reflects real processing outcome.
///
/// Handler failures are contained per event: returning an error is recorded
/// and logged but never turns the HTTP acknowledgement into a failure.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process one event
    ///
    /// # Errors
    ///
    /// Any error is wrapped in a
    /// [`HandlerExecutionError`](crate::dispatch::HandlerExecutionError) and
    /// surfaced through logging and the routing outcome; it does not abort
    /// the request.
    async fn handle(&self, event: &EventEnvelope) -> anyhow::Result<()>;
}

// ============================================================================
// Error Types
// ============================================================================

/// Handler registration failure
///
/// Raised at startup only; a process that hits one of these exits before
/// serving traffic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A handler is already registered for this event type.
    #[error("A handler is already registered for event type '{event_type}'")]
    DuplicateHandler { event_type: EventType },

    /// Lifecycle event types are routed to the lifecycle hooks, never to the
    /// registry, so registering a handler for one is always a bug.
    #[error("Event type '{event_type}' is reserved for lifecycle handling")]
    ReservedEventType { event_type: EventType },
}

// ============================================================================
// HandlerRegistry
// ============================================================================

/// Static mapping from event type to handler
///
/// # Examples
///
/// ```rust
/// use hook_harbor_core::registry::{EventHandler, HandlerRegistry};
/// use hook_harbor_core::{EventEnvelope, EventType};
/// use async_trait::async_trait;
///
/// struct NoopHandler;
///
/// #[async_trait]
/// impl EventHandler for NoopHandler {
///     async fn handle(&self, _event: &EventEnvelope) -> anyhow::Result<()> {
///         Ok(())
///     }
/// }
///
/// let mut registry = HandlerRegistry::new();
/// let contact_create = EventType::new("ContactCreate").unwrap();
/// registry
///     .register(contact_create.clone(), std::sync::Arc::new(NoopHandler))
///     .unwrap();
/// assert!(registry.get(&contact_create).is_some());
/// ```
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<EventType, Arc<dyn EventHandler>>,
}

impl HandlerRegistry {
    /// Create new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an event type
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateHandler`] when a handler is already
    /// registered for `event_type`, and [`RegistryError::ReservedEventType`]
    /// when `event_type` is a lifecycle type.
    pub fn register(
        &mut self,
        event_type: EventType,
        handler: Arc<dyn EventHandler>,
    ) -> Result<(), RegistryError> {
        if is_lifecycle_event(&event_type) {
            return Err(RegistryError::ReservedEventType { event_type });
        }

        if self.handlers.contains_key(&event_type) {
            return Err(RegistryError::DuplicateHandler { event_type });
        }

        self.handlers.insert(event_type, handler);
        Ok(())
    }

    /// Look up the handler for an event type
    pub fn get(&self, event_type: &EventType) -> Option<&Arc<dyn EventHandler>> {
        self.handlers.get(event_type)
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered event types, for startup logging
    pub fn registered_types(&self) -> Vec<&EventType> {
        let mut types: Vec<&EventType> = self.handlers.keys().collect();
        types.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        types
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("registered", &self.registered_types())
            .finish()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
