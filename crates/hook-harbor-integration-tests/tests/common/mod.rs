//! Common test utilities for hook-harbor-api integration tests
//!
//! This module provides:
//! - A recording handler and a failing handler
//! - A harness assembling real pipeline components behind the router
//! - Helpers for building signed webhook requests

// Not every test binary exercises every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use hook_harbor_api::{AppState, ServiceConfig};
use hook_harbor_core::{
    EventDispatcher, EventEnvelope, EventHandler, EventType, HandlerRegistry,
    InMemoryCredentialStore, SharedSecretVerifier,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Shared secret for all integration tests.
pub const TEST_SECRET: &str = "integration-test-secret";

// ============================================================================
// Test Handlers
// ============================================================================

/// Handler that counts invocations and records the payloads it receives.
#[derive(Default)]
pub struct RecordingHandler {
    calls: AtomicUsize,
    payloads: Mutex<Vec<serde_json::Value>>,
}

impl RecordingHandler {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn payloads(&self) -> Vec<serde_json::Value> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn handle(&self, event: &EventEnvelope) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(event.payload.clone());
        Ok(())
    }
}

/// Handler that always fails.
pub struct FailingHandler;

#[async_trait]
impl EventHandler for FailingHandler {
    async fn handle(&self, _event: &EventEnvelope) -> anyhow::Result<()> {
        anyhow::bail!("simulated downstream failure")
    }
}

// ============================================================================
// Test Harness
// ============================================================================

/// Fully wired application backed by real pipeline components.
pub struct TestHarness {
    pub app: axum::Router,
    pub store: Arc<InMemoryCredentialStore>,
}

/// Build a harness with the given handler registrations.
pub fn harness(registrations: Vec<(&str, Arc<dyn EventHandler>)>) -> TestHarness {
    let mut config = ServiceConfig::default();
    config.auth.shared_secret = TEST_SECRET.to_string();

    let mut registry = HandlerRegistry::new();
    for (event_type, handler) in registrations {
        registry
            .register(EventType::new(event_type).unwrap(), handler)
            .unwrap();
    }

    let store = Arc::new(InMemoryCredentialStore::new());
    let dispatcher = Arc::new(EventDispatcher::new(
        Arc::new(SharedSecretVerifier::new(TEST_SECRET.to_string())),
        Arc::new(registry),
        store.clone(),
        config.webhook.handler_timeout(),
    ));

    let app = hook_harbor_api::create_router(AppState::new(config, dispatcher));
    TestHarness { app, store }
}

// ============================================================================
// Request Builders
// ============================================================================

/// POST /webhook with a valid signature over `body`.
pub fn signed_webhook_request(body: &serde_json::Value) -> Request<Body> {
    let bytes = serde_json::to_vec(body).unwrap();
    let signature = SharedSecretVerifier::new(TEST_SECRET.to_string())
        .sign(&bytes)
        .unwrap();

    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .header("x-wh-signature", signature)
        .body(Body::from(bytes))
        .unwrap()
}

/// POST /webhook with a deliberately wrong signature.
pub fn tampered_webhook_request(body: &serde_json::Value) -> Request<Body> {
    let bytes = serde_json::to_vec(body).unwrap();

    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .header("x-wh-signature", format!("sha256={}", "0".repeat(64)))
        .body(Body::from(bytes))
        .unwrap()
}

/// Parse a JSON response body.
pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
