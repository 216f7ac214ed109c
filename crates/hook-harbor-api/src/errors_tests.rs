//! Tests for HTTP status mapping of handler errors.

use super::*;
use hook_harbor_core::{
    AuthenticationError, CredentialStoreError, DispatchError, MalformedPayloadError,
};

fn status_of(error: WebhookHandlerError) -> StatusCode {
    error.into_response().status()
}

#[test]
fn test_authentication_failures_map_to_401() {
    for auth_error in [
        AuthenticationError::MissingSignature,
        AuthenticationError::SignatureMismatch,
        AuthenticationError::MalformedSignature {
            message: "not hex".to_string(),
        },
    ] {
        let error = WebhookHandlerError::Dispatch(DispatchError::Authentication(auth_error));
        assert_eq!(status_of(error), StatusCode::UNAUTHORIZED);
    }
}

#[test]
fn test_malformed_payload_maps_to_400() {
    let error = WebhookHandlerError::Dispatch(DispatchError::MalformedPayload(
        MalformedPayloadError::MissingField {
            field: "type".to_string(),
        },
    ));
    assert_eq!(status_of(error), StatusCode::BAD_REQUEST);
}

#[test]
fn test_invalid_headers_map_to_400() {
    let error = WebhookHandlerError::InvalidHeaders(
        hook_harbor_core::ValidationError::InvalidFormat {
            field: "content_type".to_string(),
            message: "must be application/json".to_string(),
        },
    );
    assert_eq!(status_of(error), StatusCode::BAD_REQUEST);
}

#[test]
fn test_credential_store_failure_maps_to_503_with_retry_after() {
    let error = WebhookHandlerError::Dispatch(DispatchError::CredentialStore(
        CredentialStoreError::Unavailable {
            message: "store offline".to_string(),
        },
    ));

    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(
        response.headers().contains_key("Retry-After"),
        "503 must carry Retry-After so the sender redelivers"
    );
}

#[test]
fn test_internal_error_maps_to_500_with_sanitized_body() {
    let error = WebhookHandlerError::Internal {
        message: "secret connection string leaked".to_string(),
    };

    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
