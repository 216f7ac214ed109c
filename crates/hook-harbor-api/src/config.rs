//! Service configuration types.
//!
//! Every field carries a serde default so that an absent configuration file
//! or an entirely unconfigured environment deserializes into a valid (if
//! unusable without a secret) configuration. [`ServiceConfig::validate`]
//! runs at startup and turns deliberate-but-broken operator configuration
//! into a hard error before the listener binds.

use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Configuration
// ============================================================================

/// Service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Webhook processing settings
    pub webhook: WebhookConfig,

    /// Upstream platform application settings
    pub auth: AuthConfig,

    /// Credential store settings
    pub credentials: CredentialStoreConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Validate the assembled configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] for required values that are absent
    /// and [`ConfigError::Invalid`] for values that are present but
    /// unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.shared_secret.is_empty() {
            return Err(ConfigError::Missing {
                key: "auth.shared_secret".to_string(),
            });
        }

        if self.server.port == 0 {
            return Err(ConfigError::Invalid {
                message: "server.port must be non-zero".to_string(),
            });
        }

        if !self.webhook.endpoint_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                message: "webhook.endpoint_path must start with '/'".to_string(),
            });
        }

        if self.webhook.handler_timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                message: "webhook.handler_timeout_seconds must be non-zero".to_string(),
            });
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,

    /// Maximum request size in bytes
    pub max_body_size: usize,

    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_seconds: 30,
            max_body_size: 2 * 1024 * 1024, // 2MB
            enable_cors: false,
        }
    }
}

/// Webhook processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Webhook endpoint path
    pub endpoint_path: String,

    /// Per-handler execution timeout in seconds
    pub handler_timeout_seconds: u64,
}

impl WebhookConfig {
    /// Handler timeout as a [`Duration`]
    pub fn handler_timeout(&self) -> Duration {
        Duration::from_secs(self.handler_timeout_seconds)
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            endpoint_path: "/webhook".to_string(),
            handler_timeout_seconds: 10,
        }
    }
}

/// Upstream platform application configuration
///
/// The client identifier names this application to the upstream platform;
/// the shared secret keys webhook signature verification. Both are sourced
/// from the environment at process start (`HARBOR__AUTH__CLIENT_ID`,
/// `HARBOR__AUTH__SHARED_SECRET`) or from a configuration file.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Application client identifier
    pub client_id: String,

    /// Shared secret for webhook signature verification
    pub shared_secret: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("client_id", &self.client_id)
            .field("shared_secret", &"<REDACTED>")
            .finish()
    }
}

/// Credential store configuration
///
/// When `directory` is set, credentials are persisted as JSON files under
/// it; otherwise an in-memory store is used and a startup `WARN` reminds
/// operators that credentials will not survive a restart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialStoreConfig {
    /// Base directory for the filesystem store
    pub directory: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level
    pub level: String,

    /// Enable JSON structured logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {key}")]
    Missing { key: String },
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
