//! Integration tests for the health and readiness endpoints.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{harness, response_json};
use tower::ServiceExt; // For `oneshot`

/// Verify that GET /health reports healthy.
#[tokio::test]
async fn test_health_endpoint_reports_healthy() {
    // Arrange
    let h = harness(vec![]);
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    // Act
    let response = h.app.oneshot(request).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "hook-harbor");
}

/// Verify that GET /ready reports ready.
#[tokio::test]
async fn test_ready_endpoint_reports_ready() {
    // Arrange
    let h = harness(vec![]);
    let request = Request::builder()
        .uri("/ready")
        .body(Body::empty())
        .unwrap();

    // Act
    let response = h.app.oneshot(request).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["ready"], true);
}

/// Verify that POST to health endpoints is not allowed.
#[tokio::test]
async fn test_health_rejects_post() {
    // Arrange
    let h = harness(vec![]);
    let request = Request::builder()
        .method("POST")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    // Act
    let response = h.app.oneshot(request).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
