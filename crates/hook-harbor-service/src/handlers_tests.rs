//! Tests for the deployment's handler set.

use super::*;
use hook_harbor_core::{WebhookHeaders, WebhookRequest};
use serde_json::json;

fn envelope_for(body: serde_json::Value) -> EventEnvelope {
    let headers = WebhookHeaders {
        signature: Some("sha256=00".to_string()),
        content_type: "application/json".to_string(),
    };
    WebhookRequest::new(
        headers,
        bytes::Bytes::from(serde_json::to_vec(&body).unwrap()),
    )
    .parse()
    .unwrap()
}

#[test]
fn test_register_all_covers_expected_types() {
    let mut registry = HandlerRegistry::new();
    register_all(&mut registry).unwrap();

    let expected = [
        "AppointmentCreate",
        "ContactCreate",
        "ContactUpdate",
        "FormSubmission",
        "InboundMessage",
        "OpportunityStatusUpdate",
        "PaymentReceived",
    ];

    assert_eq!(registry.len(), expected.len());
    for name in expected {
        assert!(
            registry.get(&EventType::new(name).unwrap()).is_some(),
            "'{}' should be registered",
            name
        );
    }
}

#[test]
fn test_register_all_twice_conflicts() {
    let mut registry = HandlerRegistry::new();
    register_all(&mut registry).unwrap();

    let result = register_all(&mut registry);
    assert!(matches!(result, Err(RegistryError::DuplicateHandler { .. })));
}

#[tokio::test]
async fn test_contact_create_handler_accepts_contact_payload() {
    let handler = ContactCreateHandler;
    let envelope = envelope_for(json!({
        "type": "ContactCreate",
        "data": {
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "jane@example.com",
            "phone": "+15551234567"
        }
    }));

    assert!(handler.handle(&envelope).await.is_ok());
}

#[tokio::test]
async fn test_handlers_tolerate_missing_fields() {
    // Payload shapes vary across platform versions; logging handlers must
    // not fail on absent fields.
    let handlers: Vec<Arc<dyn EventHandler>> = vec![
        Arc::new(ContactCreateHandler),
        Arc::new(ContactUpdateHandler),
        Arc::new(AppointmentCreateHandler),
        Arc::new(OpportunityStatusUpdateHandler),
        Arc::new(InboundMessageHandler),
        Arc::new(PaymentReceivedHandler),
        Arc::new(FormSubmissionHandler),
    ];

    let envelope = envelope_for(json!({"type": "ContactCreate", "data": {}}));
    for handler in handlers {
        assert!(handler.handle(&envelope).await.is_ok());
    }
}

#[tokio::test]
async fn test_inbound_message_handler_truncates_long_bodies() {
    let handler = InboundMessageHandler;
    let envelope = envelope_for(json!({
        "type": "InboundMessage",
        "data": {
            "contactId": "c-1",
            "type": "SMS",
            "body": "x".repeat(500)
        }
    }));

    assert!(handler.handle(&envelope).await.is_ok());
}
