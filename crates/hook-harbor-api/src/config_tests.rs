//! Tests for service configuration defaults and validation.

use super::*;

fn valid_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.auth.shared_secret = "test-secret".to_string();
    config
}

// ============================================================================
// Default tests
// ============================================================================

mod default_tests {
    use super::*;

    #[test]
    fn test_defaults_are_sensible() {
        let config = ServiceConfig::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.webhook.endpoint_path, "/webhook");
        assert_eq!(config.webhook.handler_timeout_seconds, 10);
        assert!(config.credentials.directory.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_empty_document_deserializes_with_defaults() {
        let config: ServiceConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.webhook.endpoint_path, "/webhook");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: ServiceConfig =
            serde_json::from_str(r#"{"server": {"port": 9090}}"#).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_handler_timeout_converts_to_duration() {
        let mut config = ServiceConfig::default();
        config.webhook.handler_timeout_seconds = 3;
        assert_eq!(
            config.webhook.handler_timeout(),
            std::time::Duration::from_secs(3)
        );
    }
}

// ============================================================================
// Validation tests
// ============================================================================

mod validation_tests {
    use super::*;

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_missing_shared_secret_rejected() {
        let config = ServiceConfig::default();
        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Missing { ref key }) if key == "auth.shared_secret"
        ));
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut config = valid_config();
        config.server.port = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_relative_endpoint_path_rejected() {
        let mut config = valid_config();
        config.webhook.endpoint_path = "webhook".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_zero_handler_timeout_rejected() {
        let mut config = valid_config();
        config.webhook.handler_timeout_seconds = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }
}

// ============================================================================
// Debug formatting tests
// ============================================================================

#[test]
fn test_auth_config_debug_redacts_secret() {
    let config = valid_config();
    let debug_str = format!("{:?}", config.auth);

    assert!(
        !debug_str.contains("test-secret"),
        "shared secret must not appear in debug output; got: {}",
        debug_str
    );
    assert!(debug_str.contains("<REDACTED>"));
}
