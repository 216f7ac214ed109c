//! # Credential Model and Store Abstraction
//!
//! Credentials are created when a tenant installs the integration and
//! revoked when they uninstall it. They live in an external store; the core
//! only triggers `put` / `remove` through the [`CredentialStore`] trait from
//! the lifecycle hooks.
//!
//! Token material is held in [`AccessToken`], which zeroizes its backing
//! memory on drop and never appears in `Debug` output or logs.

use crate::{InstallationId, Timestamp};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Core Types
// ============================================================================

/// Secure container for an OAuth token value
///
/// Serializes as a plain string so credential stores can persist it; the
/// protection is against accidental disclosure through `Debug`/logging and
/// against the value lingering in freed memory.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create token from string
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the token value (only for immediate use)
    ///
    /// The returned string contains the actual secret. Use immediately and
    /// avoid storing in variables.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AccessToken").field(&"<REDACTED>").finish()
    }
}

/// A tenant installation's credential record
///
/// Created on an install event, removed on an uninstall event. The
/// `installation_id` is the upsert key: storing a credential for an
/// installation that already has one replaces the existing record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub installation_id: InstallationId,
    pub access_token: AccessToken,
    pub refresh_token: Option<AccessToken>,
    pub expires_at: Option<Timestamp>,
    pub stored_at: Timestamp,
}

impl Credential {
    /// Create a credential record stamped with the current time
    pub fn new(
        installation_id: InstallationId,
        access_token: AccessToken,
        refresh_token: Option<AccessToken>,
        expires_at: Option<Timestamp>,
    ) -> Self {
        Self {
            installation_id,
            access_token,
            refresh_token,
            expires_at,
            stored_at: Timestamp::now(),
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Failure during credential persistence
///
/// Propagated to the caller as a request failure: losing a credential write
/// corrupts future authentication for that installation, so the sender must
/// be told to redeliver.
#[derive(Debug, thiserror::Error)]
pub enum CredentialStoreError {
    #[error("Store operation failed: {message}")]
    OperationFailed { message: String },

    #[error("Store not available: {message}")]
    Unavailable { message: String },

    #[error("Credential serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CredentialStoreError {
    /// Check if the failure is transient and worth a retry
    pub fn is_transient(&self) -> bool {
        match self {
            Self::OperationFailed { .. } => true,
            Self::Unavailable { .. } => true,
            Self::Serialization(_) => false,
        }
    }
}

// ============================================================================
// Core Operations (Traits)
// ============================================================================

/// Interface for the external credential store
///
/// Upsert atomicity is the implementation's concern; callers assume that a
/// completed `put` has fully replaced any previous record for the same
/// installation and that `remove` of an absent record is not an error.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Store or replace the credential for an installation
    async fn put(&self, credential: Credential) -> Result<(), CredentialStoreError>;

    /// Remove the credential for an installation
    ///
    /// Removing an installation with no stored credential succeeds.
    async fn remove(&self, installation_id: &InstallationId) -> Result<(), CredentialStoreError>;

    /// Fetch the credential for an installation, if stored
    async fn get(
        &self,
        installation_id: &InstallationId,
    ) -> Result<Option<Credential>, CredentialStoreError>;
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;
