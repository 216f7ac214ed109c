//! # Signature Verification
//!
//! Authenticates that an inbound delivery was produced by the trusted
//! upstream sender.
//!
//! Verification operates on the raw, unparsed body bytes: computing the
//! expected HMAC over a re-serialized payload would be incorrect because
//! re-serialization is not guaranteed to be byte-identical to what the
//! sender signed.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::instrument;

type HmacSha256 = Hmac<Sha256>;

// ============================================================================
// Error Types
// ============================================================================

/// Signature verification failure
///
/// All variants abort the request with an authentication rejection; none of
/// them reach the routing stage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthenticationError {
    /// The signature header was absent from the request.
    #[error("Missing signature header")]
    MissingSignature,

    /// The signature header was present but not decodable as hex.
    #[error("Malformed signature value: {message}")]
    MalformedSignature { message: String },

    /// The signature decoded cleanly but does not match the payload.
    #[error("Signature does not match payload")]
    SignatureMismatch,

    /// The configured secret cannot be used as an HMAC key.
    #[error("Configured secret cannot be used for verification")]
    UnusableSecret,
}

// ============================================================================
// Core Operations (Traits)
// ============================================================================

/// Interface for webhook signature verification
///
/// Implementations must be pure checks: no side effects, raw-bytes input,
/// constant-time comparison of digests.
#[async_trait]
pub trait SignatureVerifier: Send + Sync {
    /// Verify `signature` against the raw `payload` bytes
    ///
    /// # Errors
    ///
    /// Returns an [`AuthenticationError`] describing why verification could
    /// not succeed. Callers treat every variant as a rejection.
    async fn verify(&self, payload: &[u8], signature: &str) -> Result<(), AuthenticationError>;
}

// ============================================================================
// SharedSecretVerifier
// ============================================================================

/// A [`SignatureVerifier`] backed by a shared HMAC-SHA256 secret
///
/// Validates signatures in `sha256=<hex-digest>` format; the `sha256=`
/// prefix is tolerated but not required. The digest comparison runs in
/// constant time to prevent timing-based secret recovery.
///
/// # Examples
///
/// ```rust
/// use hook_harbor_core::signature::SharedSecretVerifier;
///
/// let verifier = SharedSecretVerifier::new("my-secret".to_string());
/// let signature = verifier.sign(b"payload").unwrap();
/// assert!(signature.starts_with("sha256="));
/// ```
pub struct SharedSecretVerifier {
    secret: String,
}

impl SharedSecretVerifier {
    /// Construct a new verifier with the given shared secret
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Compute the `sha256=<hex>` signature of `payload` under this secret
    ///
    /// The counterpart of [`SignatureVerifier::verify`]; used by tests and
    /// by local tooling that replays captured deliveries.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationError::UnusableSecret`] when the secret
    /// cannot be used as an HMAC key.
    pub fn sign(&self, payload: &[u8]) -> Result<String, AuthenticationError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_| AuthenticationError::UnusableSecret)?;
        mac.update(payload);
        Ok(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
    }
}

impl std::fmt::Debug for SharedSecretVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecretVerifier")
            .field("secret", &"<REDACTED>")
            .finish()
    }
}

#[async_trait]
impl SignatureVerifier for SharedSecretVerifier {
    /// Verify an HMAC-SHA256 signature over the raw payload bytes
    ///
    /// The comparison uses [`subtle::ConstantTimeEq`] so that execution time
    /// does not depend on how many digest bytes match.
    #[instrument(skip(self, payload, signature), fields(sig_len = signature.len()))]
    async fn verify(&self, payload: &[u8], signature: &str) -> Result<(), AuthenticationError> {
        let hex_part = signature.strip_prefix("sha256=").unwrap_or(signature);
        let provided =
            hex::decode(hex_part).map_err(|_| AuthenticationError::MalformedSignature {
                message: "signature is not valid hex".to_string(),
            })?;

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_| AuthenticationError::UnusableSecret)?;
        mac.update(payload);
        let expected = mac.finalize().into_bytes();

        if expected.as_slice().ct_eq(provided.as_slice()).into() {
            Ok(())
        } else {
            Err(AuthenticationError::SignatureMismatch)
        }
    }
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;
