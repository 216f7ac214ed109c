//! # Hook-Harbor HTTP Service
//!
//! HTTP server for receiving CRM platform webhooks and dispatching them
//! through the Hook-Harbor pipeline.
//!
//! This service provides:
//! - Webhook endpoint with signature verification and lifecycle handling
//! - Health and readiness endpoints
//! - Correlation-ID request logging

pub mod config;
pub mod errors;
pub mod responses;

pub use config::{
    AuthConfig, ConfigError, CredentialStoreConfig, LoggingConfig, ServerConfig, ServiceConfig,
    WebhookConfig,
};
pub use errors::{ServiceError, WebhookHandlerError};
pub use responses::{HealthResponse, ReadinessResponse, WebhookAck};

use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderMap,
    middleware,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use hook_harbor_core::{EventDispatcher, Timestamp, WebhookHeaders, WebhookRequest};
use std::{collections::HashMap, net::SocketAddr, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, instrument, warn};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration for the service
    pub config: ServiceConfig,

    /// Dispatcher carrying verification, lifecycle, and routing
    pub dispatcher: Arc<EventDispatcher>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: ServiceConfig, dispatcher: Arc<EventDispatcher>) -> Self {
        Self { config, dispatcher }
    }
}

// ============================================================================
// HTTP Server
// ============================================================================

/// Create HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let webhook_routes = Router::new().route(
        &state.config.webhook.endpoint_path,
        post(handle_webhook).layer(DefaultBodyLimit::max(state.config.server.max_body_size)),
    );

    let health_routes = Router::new()
        .route("/health", get(handle_health_check))
        .route("/ready", get(handle_readiness_check));

    let router = Router::new()
        .merge(webhook_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging_middleware))
                .into_inner(),
        );

    let router = if state.config.server.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}

/// Start HTTP server
///
/// Binds the configured address, serves until SIGINT/SIGTERM, and lets
/// in-flight requests complete before shutting down.
pub async fn start_server(
    config: ServiceConfig,
    dispatcher: Arc<EventDispatcher>,
) -> Result<(), ServiceError> {
    let state = AppState::new(config.clone(), dispatcher);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| ServiceError::BindFailed {
            address: format!("{}:{}", config.server.host, config.server.port),
            message: format!("invalid bind address: {}", e),
        })?;

    let listener =
        tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServiceError::BindFailed {
                address: addr.to_string(),
                message: e.to_string(),
            })?;

    info!("Starting HTTP server on {}", addr);

    let shutdown_timeout =
        std::time::Duration::from_secs(config.server.shutdown_timeout_seconds);

    let shutdown_signal = async move {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C signal handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!(
                    "Received SIGINT (Ctrl+C), initiating graceful shutdown with {}s timeout",
                    shutdown_timeout.as_secs()
                );
            },
            _ = terminate => {
                info!(
                    "Received SIGTERM, initiating graceful shutdown with {}s timeout",
                    shutdown_timeout.as_secs()
                );
            },
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ServiceError::ServerFailed {
            message: e.to_string(),
        })?;

    info!("HTTP server shutdown complete");
    Ok(())
}

// ============================================================================
// Webhook Handlers
// ============================================================================

/// Handle an inbound webhook delivery
///
/// The body reaches the dispatcher as raw bytes: signature verification
/// must see exactly what the sender signed, so parsing happens inside the
/// pipeline after authentication.
///
/// The response is definitive and prompt: 200 with an acknowledgement body
/// whenever the delivery was verified and routed (including the unhandled
/// and handler-failure cases), an error status only when verification,
/// parsing, or credential persistence failed.
#[instrument(skip(state, headers, body))]
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, WebhookHandlerError> {
    // Convert headers to a lowercased map
    let header_map: HashMap<String, String> = headers
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_lowercase(),
                v.to_str().unwrap_or("").to_string(),
            )
        })
        .collect();

    let webhook_headers = WebhookHeaders::from_http_headers(&header_map)
        .map_err(WebhookHandlerError::InvalidHeaders)?;

    let request = WebhookRequest::new(webhook_headers, body);
    let outcome = state.dispatcher.dispatch(request).await?;

    info!(outcome = outcome.as_str(), "Delivery acknowledged");

    Ok(Json(WebhookAck::from_outcome(&outcome)))
}

// ============================================================================
// Health Check Handlers
// ============================================================================

/// Basic health check endpoint
///
/// Fixed healthy status, no business logic; the process answering at all is
/// the signal.
#[instrument(skip_all)]
async fn handle_health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness check for load balancers
///
/// The registry and dispatcher are constructed before the listener binds,
/// so a process that accepts connections is ready.
#[instrument(skip_all)]
async fn handle_readiness_check() -> Json<ReadinessResponse> {
    Json(ReadinessResponse {
        ready: true,
        timestamp: Timestamp::now(),
    })
}

// ============================================================================
// Middleware
// ============================================================================

/// Request logging middleware with correlation ID tracking
///
/// - Extracts or generates a correlation ID for request tracking
/// - Logs request start and completion with structured fields
/// - Propagates the correlation ID through response headers
#[instrument(skip(request, next), fields(
    method = %request.method(),
    uri = %request.uri(),
    correlation_id
))]
async fn request_logging_middleware(
    mut request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let correlation_id = request
        .headers()
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    tracing::Span::current().record("correlation_id", correlation_id.as_str());

    request.extensions_mut().insert(correlation_id.clone());

    let mut response = next.run(request).await;
    let duration = start.elapsed();

    if let Ok(header_value) = correlation_id.parse() {
        response
            .headers_mut()
            .insert("x-correlation-id", header_value);
    }

    let status = response.status();

    if status.is_server_error() {
        error!(
            correlation_id = %correlation_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with server error"
        );
    } else if status.is_client_error() {
        warn!(
            correlation_id = %correlation_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with client error"
        );
    } else {
        info!(
            correlation_id = %correlation_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed successfully"
        );
    }

    response
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
