//! Tests for the shared identifier and time types.

use super::*;

// ============================================================================
// EventType tests
// ============================================================================

mod event_type_tests {
    use super::*;

    #[test]
    fn test_valid_event_types_accepted() {
        for value in ["ContactCreate", "INSTALL", "OpportunityStatusUpdate", "x"] {
            let event_type = EventType::new(value);
            assert!(event_type.is_ok(), "'{}' should be valid", value);
            assert_eq!(event_type.unwrap().as_str(), value);
        }
    }

    #[test]
    fn test_empty_event_type_rejected() {
        let result = EventType::new("");
        assert!(matches!(result, Err(ValidationError::Required { .. })));
    }

    #[test]
    fn test_overlong_event_type_rejected() {
        let result = EventType::new("A".repeat(65));
        assert!(matches!(result, Err(ValidationError::TooLong { .. })));
    }

    #[test]
    fn test_non_alphanumeric_event_type_rejected() {
        for value in ["Contact-Create", "contact.create", "Contact Create", "a/b"] {
            let result = EventType::new(value);
            assert!(
                matches!(result, Err(ValidationError::InvalidCharacters { .. })),
                "'{}' should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_event_type_parses_from_str() {
        let event_type: EventType = "InboundMessage".parse().unwrap();
        assert_eq!(event_type.as_str(), "InboundMessage");
    }
}

// ============================================================================
// InstallationId tests
// ============================================================================

mod installation_id_tests {
    use super::*;

    #[test]
    fn test_valid_installation_ids_accepted() {
        for value in ["loc-123", "ve9EPM428h8vShlRW1KT", "tenant_7"] {
            assert!(
                InstallationId::new(value).is_ok(),
                "'{}' should be valid",
                value
            );
        }
    }

    #[test]
    fn test_empty_installation_id_rejected() {
        assert!(matches!(
            InstallationId::new(""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_installation_id_with_path_characters_rejected() {
        // Installation IDs become file names in the filesystem store; path
        // separators and dots must never validate.
        for value in ["../etc", "a/b", "a.b", "a b"] {
            assert!(
                InstallationId::new(value).is_err(),
                "'{}' should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_overlong_installation_id_rejected() {
        let result = InstallationId::new("a".repeat(129));
        assert!(matches!(result, Err(ValidationError::TooLong { .. })));
    }
}

// ============================================================================
// EventId and CorrelationId tests
// ============================================================================

mod id_tests {
    use super::*;

    #[test]
    fn test_event_ids_are_unique() {
        let a = EventId::new();
        let b = EventId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_event_id_round_trips_through_string() {
        let id = EventId::new();
        let parsed: EventId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_event_id_rejects_garbage() {
        let result = "not-a-ulid!".parse::<EventId>();
        assert!(matches!(
            result,
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_correlation_ids_are_unique() {
        assert_ne!(CorrelationId::new(), CorrelationId::new());
    }
}

// ============================================================================
// Timestamp tests
// ============================================================================

mod timestamp_tests {
    use super::*;

    #[test]
    fn test_timestamp_round_trips_through_rfc3339() {
        let ts = Timestamp::now();
        let parsed = Timestamp::from_rfc3339(&ts.to_rfc3339()).unwrap();
        assert_eq!(ts.as_datetime(), parsed.as_datetime());
    }

    #[test]
    fn test_timestamp_rejects_non_rfc3339() {
        assert!(Timestamp::from_rfc3339("yesterday").is_err());
    }

    #[test]
    fn test_add_seconds_moves_forward() {
        let ts = Timestamp::now();
        let later = ts.add_seconds(3600);
        assert!(later > ts);
        assert_eq!(later.duration_since(ts).as_secs(), 3600);
    }
}
