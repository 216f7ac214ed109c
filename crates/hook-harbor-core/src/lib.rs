//! # Hook-Harbor Core
//!
//! Core business logic for the Hook-Harbor CRM webhook intake and dispatch
//! service.
//!
//! This crate contains the domain logic for authenticating inbound webhook
//! deliveries, handling integration install/uninstall lifecycle events, and
//! routing events to registered handlers.
//!
//! ## Architecture
//!
//! The core follows clean architecture principles:
//! - Business logic depends only on trait abstractions
//! - Infrastructure implementations are injected at runtime
//! - All external dependencies are abstracted behind traits
//!
//! ## Usage
//!
//! ```rust
//! use hook_harbor_core::{EventId, EventType};
//!
//! let event_id = EventId::new();
//! let event_type = EventType::new("ContactCreate").unwrap();
//! assert_eq!(event_type.as_str(), "ContactCreate");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

// Re-export commonly used types
pub use ulid::Ulid;
pub use uuid::Uuid;

// ============================================================================
// Domain Identifier Types
// ============================================================================

/// Unique identifier for inbound webhook events
///
/// Uses ULID for lexicographic sorting and global uniqueness. Stamped on
/// every parsed event envelope so that log lines across the dispatch
/// pipeline can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Ulid);

impl EventId {
    /// Generate a new unique event ID
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Get string representation of event ID
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ulid = s.parse::<Ulid>().map_err(|_| ValidationError::InvalidFormat {
            field: "event_id".to_string(),
            message: "must be a ULID".to_string(),
        })?;
        Ok(Self(ulid))
    }
}

/// Identifier for tracing a request across system boundaries
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Generate new correlation ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get string representation
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event-type discriminant selecting the handler for an inbound event
///
/// The upstream platform uses CamelCase identifiers such as `ContactCreate`
/// or `OpportunityStatusUpdate`, plus the reserved uppercase lifecycle types
/// `INSTALL` and `UNINSTALL`.
///
/// # Validation Rules
/// - Must be 1-64 characters
/// - Must contain only ASCII alphanumeric characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventType(String);

impl EventType {
    /// Create new event type with validation
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();

        if value.is_empty() {
            return Err(ValidationError::Required {
                field: "event_type".to_string(),
            });
        }

        if value.len() > 64 {
            return Err(ValidationError::TooLong {
                field: "event_type".to_string(),
                max_length: 64,
            });
        }

        if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValidationError::InvalidCharacters {
                field: "event_type".to_string(),
                invalid_chars: "non-alphanumeric".to_string(),
            });
        }

        Ok(Self(value))
    }

    /// Get string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Identifier of a single tenant's installation of the integration
///
/// The upstream platform calls this the installation or location identifier;
/// it keys every credential record in the [`CredentialStore`].
///
/// # Validation Rules
/// - Must be 1-128 characters
/// - Must contain only ASCII alphanumeric characters, hyphens, and underscores
///
/// [`CredentialStore`]: crate::credentials::CredentialStore
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstallationId(String);

impl InstallationId {
    /// Create new installation ID with validation
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();

        if value.is_empty() {
            return Err(ValidationError::Required {
                field: "installation_id".to_string(),
            });
        }

        if value.len() > 128 {
            return Err(ValidationError::TooLong {
                field: "installation_id".to_string(),
                max_length: 128,
            });
        }

        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidCharacters {
                field: "installation_id".to_string(),
                invalid_chars: "non-alphanumeric except hyphens and underscores".to_string(),
            });
        }

        Ok(Self(value))
    }

    /// Get string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstallationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InstallationId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ============================================================================
// Time Types
// ============================================================================

/// UTC timestamp with microsecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create timestamp for current moment
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parse timestamp from RFC3339 string
    pub fn from_rfc3339(s: &str) -> Result<Self, ValidationError> {
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "timestamp".to_string(),
                message: "must be RFC3339".to_string(),
            })?
            .with_timezone(&Utc);
        Ok(Self(dt))
    }

    /// Convert to RFC3339 string
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Get underlying DateTime
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Add seconds to timestamp
    pub fn add_seconds(&self, seconds: u64) -> Self {
        Self(self.0 + chrono::Duration::seconds(seconds as i64))
    }

    /// Get duration since another timestamp
    pub fn duration_since(&self, other: Self) -> Duration {
        self.0
            .signed_duration_since(other.0)
            .to_std()
            .unwrap_or_default()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Error type for input validation failures
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Field '{field}' is required")]
    Required { field: String },

    #[error("Field '{field}' has invalid format: {message}")]
    InvalidFormat { field: String, message: String },

    #[error("Field '{field}' exceeds maximum length of {max_length}")]
    TooLong { field: String, max_length: usize },

    #[error("Field '{field}' contains invalid characters: {invalid_chars}")]
    InvalidCharacters {
        field: String,
        invalid_chars: String,
    },
}

// ============================================================================
// Module declarations
// ============================================================================

/// Inbound event model: raw request, headers, parsed envelope
pub mod event;

/// Signature verification for inbound deliveries
pub mod signature;

/// Credential model and store abstraction
pub mod credentials;

/// Credential store implementations
pub mod adapters;

/// Handler trait and write-once handler registry
pub mod registry;

/// Install/uninstall lifecycle hooks
pub mod lifecycle;

/// The dispatch pipeline tying verification, lifecycle, and routing together
pub mod dispatch;

// Re-export key types for convenience
pub use adapters::{FileCredentialStore, InMemoryCredentialStore};
pub use credentials::{AccessToken, Credential, CredentialStore, CredentialStoreError};
pub use dispatch::{DispatchError, EventDispatcher, HandlerExecutionError, RoutingOutcome};
pub use event::{EventEnvelope, MalformedPayloadError, WebhookHeaders, WebhookRequest};
pub use lifecycle::{LifecycleError, LifecycleHooks, INSTALL_EVENT, UNINSTALL_EVENT};
pub use registry::{EventHandler, HandlerRegistry, RegistryError};
pub use signature::{AuthenticationError, SharedSecretVerifier, SignatureVerifier};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
