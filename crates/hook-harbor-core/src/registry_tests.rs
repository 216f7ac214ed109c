//! Tests for [`HandlerRegistry`] registration rules and lookup.

use super::*;
use crate::EventEnvelope;

struct NoopHandler;

#[async_trait]
impl EventHandler for NoopHandler {
    async fn handle(&self, _event: &EventEnvelope) -> anyhow::Result<()> {
        Ok(())
    }
}

fn event_type(value: &str) -> EventType {
    EventType::new(value).unwrap()
}

#[test]
fn test_register_then_get_finds_handler() {
    let mut registry = HandlerRegistry::new();
    registry
        .register(event_type("ContactCreate"), Arc::new(NoopHandler))
        .unwrap();

    assert!(registry.get(&event_type("ContactCreate")).is_some());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_unregistered_type_yields_none() {
    let registry = HandlerRegistry::new();
    assert!(registry.get(&event_type("ContactCreate")).is_none());
    assert!(registry.is_empty());
}

#[test]
fn test_duplicate_registration_rejected() {
    let mut registry = HandlerRegistry::new();
    registry
        .register(event_type("ContactCreate"), Arc::new(NoopHandler))
        .unwrap();

    let result = registry.register(event_type("ContactCreate"), Arc::new(NoopHandler));
    assert_eq!(
        result,
        Err(RegistryError::DuplicateHandler {
            event_type: event_type("ContactCreate")
        })
    );

    // The original registration must survive the rejected attempt.
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_lifecycle_types_are_reserved() {
    let mut registry = HandlerRegistry::new();

    for reserved in ["INSTALL", "UNINSTALL"] {
        let result = registry.register(event_type(reserved), Arc::new(NoopHandler));
        assert_eq!(
            result,
            Err(RegistryError::ReservedEventType {
                event_type: event_type(reserved)
            }),
            "'{}' must be rejected",
            reserved
        );
    }

    assert!(registry.is_empty());
}

#[test]
fn test_registered_types_are_sorted() {
    let mut registry = HandlerRegistry::new();
    for name in ["InboundMessage", "ContactCreate", "FormSubmission"] {
        registry
            .register(event_type(name), Arc::new(NoopHandler))
            .unwrap();
    }

    let names: Vec<&str> = registry
        .registered_types()
        .into_iter()
        .map(|t| t.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["ContactCreate", "FormSubmission", "InboundMessage"]
    );
}
