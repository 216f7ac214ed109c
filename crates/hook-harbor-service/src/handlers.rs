//! Application event handlers for the CRM event types this deployment
//! consumes.
//!
//! Each handler logs the fields relevant to its event; the business logic
//! that would hang off them (syncing to an external system, auto-replies,
//! fulfillment) is application-specific and intentionally absent here.

use async_trait::async_trait;
use hook_harbor_core::{EventEnvelope, EventHandler, EventType, HandlerRegistry, RegistryError};
use std::sync::Arc;
use tracing::info;

/// Register every handler this deployment consumes
///
/// Called once at startup, before the listener binds. Duplicate or reserved
/// registrations are startup bugs; the error propagates and the process
/// exits.
pub fn register_all(registry: &mut HandlerRegistry) -> Result<(), RegistryError> {
    registry.register(
        EventType::new("ContactCreate").expect("static event type"),
        Arc::new(ContactCreateHandler),
    )?;
    registry.register(
        EventType::new("ContactUpdate").expect("static event type"),
        Arc::new(ContactUpdateHandler),
    )?;
    registry.register(
        EventType::new("AppointmentCreate").expect("static event type"),
        Arc::new(AppointmentCreateHandler),
    )?;
    registry.register(
        EventType::new("OpportunityStatusUpdate").expect("static event type"),
        Arc::new(OpportunityStatusUpdateHandler),
    )?;
    registry.register(
        EventType::new("InboundMessage").expect("static event type"),
        Arc::new(InboundMessageHandler),
    )?;
    registry.register(
        EventType::new("PaymentReceived").expect("static event type"),
        Arc::new(PaymentReceivedHandler),
    )?;
    registry.register(
        EventType::new("FormSubmission").expect("static event type"),
        Arc::new(FormSubmissionHandler),
    )?;

    Ok(())
}

/// String field from a payload, empty when absent
fn field<'a>(event: &'a EventEnvelope, name: &str) -> &'a str {
    event.payload.get(name).and_then(|v| v.as_str()).unwrap_or("")
}

// ============================================================================
// Handlers
// ============================================================================

/// New contact creation
pub struct ContactCreateHandler;

#[async_trait]
impl EventHandler for ContactCreateHandler {
    async fn handle(&self, event: &EventEnvelope) -> anyhow::Result<()> {
        info!(
            event_id = %event.event_id,
            first_name = field(event, "firstName"),
            last_name = field(event, "lastName"),
            email = field(event, "email"),
            phone = field(event, "phone"),
            "New contact created"
        );
        Ok(())
    }
}

/// Contact updates
pub struct ContactUpdateHandler;

#[async_trait]
impl EventHandler for ContactUpdateHandler {
    async fn handle(&self, event: &EventEnvelope) -> anyhow::Result<()> {
        info!(
            event_id = %event.event_id,
            contact_id = field(event, "id"),
            "Contact updated"
        );
        Ok(())
    }
}

/// New appointment bookings
pub struct AppointmentCreateHandler;

#[async_trait]
impl EventHandler for AppointmentCreateHandler {
    async fn handle(&self, event: &EventEnvelope) -> anyhow::Result<()> {
        info!(
            event_id = %event.event_id,
            title = field(event, "title"),
            start_time = field(event, "startTime"),
            contact_id = field(event, "contactId"),
            "New appointment booked"
        );
        Ok(())
    }
}

/// Opportunity status changes (won/lost/etc)
pub struct OpportunityStatusUpdateHandler;

#[async_trait]
impl EventHandler for OpportunityStatusUpdateHandler {
    async fn handle(&self, event: &EventEnvelope) -> anyhow::Result<()> {
        info!(
            event_id = %event.event_id,
            name = field(event, "name"),
            status = field(event, "status"),
            "Opportunity status changed"
        );
        Ok(())
    }
}

/// Incoming messages (SMS, email, etc)
pub struct InboundMessageHandler;

#[async_trait]
impl EventHandler for InboundMessageHandler {
    async fn handle(&self, event: &EventEnvelope) -> anyhow::Result<()> {
        let body = field(event, "body");
        let preview: String = body.chars().take(100).collect();
        info!(
            event_id = %event.event_id,
            contact_id = field(event, "contactId"),
            message_type = field(event, "type"),
            preview = %preview,
            "Inbound message received"
        );
        Ok(())
    }
}

/// Payment notifications
pub struct PaymentReceivedHandler;

#[async_trait]
impl EventHandler for PaymentReceivedHandler {
    async fn handle(&self, event: &EventEnvelope) -> anyhow::Result<()> {
        // Amounts arrive in cents.
        let amount_cents = event
            .payload
            .get("amount")
            .and_then(|a| a.as_u64())
            .unwrap_or(0);
        info!(
            event_id = %event.event_id,
            amount = %format!("{:.2}", amount_cents as f64 / 100.0),
            "Payment received"
        );
        Ok(())
    }
}

/// Form submissions
pub struct FormSubmissionHandler;

#[async_trait]
impl EventHandler for FormSubmissionHandler {
    async fn handle(&self, event: &EventEnvelope) -> anyhow::Result<()> {
        info!(
            event_id = %event.event_id,
            form_id = field(event, "formId"),
            "Form submitted"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
