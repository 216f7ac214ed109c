//! # Hook-Harbor Service
//!
//! Binary entry point for the Hook-Harbor HTTP service.
//!
//! This executable:
//! - Loads configuration from environment and files
//! - Initializes logging
//! - Builds the signature verifier, credential store, and handler registry
//! - Starts the HTTP server from hook-harbor-api

mod handlers;

use hook_harbor_api::{start_server, ServiceConfig, ServiceError};
use hook_harbor_core::{
    CredentialStore, EventDispatcher, FileCredentialStore, HandlerRegistry,
    InMemoryCredentialStore, SharedSecretVerifier,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "hook_harbor_service=info,hook_harbor_api=info,hook_harbor_core=info,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Hook-Harbor Service");

    // -------------------------------------------------------------------------
    // Load configuration
    //
    // Sources (applied in order — later sources override earlier ones):
    //  1. /etc/hook-harbor/service.yaml     — system-wide defaults
    //  2. ./config/service.yaml             — deployment-local override
    //  3. Path given by HARBOR_CONFIG_FILE  — operator-specified file
    //  4. Environment variables prefixed HARBOR__ (double-underscore
    //     separator), e.g. HARBOR__SERVER__PORT=9090 sets server.port,
    //     HARBOR__AUTH__SHARED_SECRET supplies the webhook secret.
    //
    // All configuration fields carry serde defaults, so absent files or an
    // entirely unconfigured environment produces a structurally valid config
    // (validation still requires the shared secret). A malformed file or an
    // environment variable that cannot be coerced to the correct type IS a
    // hard error because it indicates deliberate-but-broken operator
    // configuration.
    // -------------------------------------------------------------------------
    let mut config_builder = config::Config::builder()
        .add_source(
            config::File::with_name("/etc/hook-harbor/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        )
        .add_source(
            config::File::with_name("config/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        );

    // Optional explicit path supplied by the operator.
    if let Ok(explicit_path) = std::env::var("HARBOR_CONFIG_FILE") {
        if !explicit_path.is_empty() {
            config_builder = config_builder.add_source(
                config::File::with_name(&explicit_path)
                    .required(true)
                    .format(config::FileFormat::Yaml),
            );
            info!(path = %explicit_path, "Loading configuration from explicit path");
        }
    }

    let config = match config_builder
        .add_source(config::Environment::with_prefix("HARBOR").separator("__"))
        .build()
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "Failed to build configuration; aborting");
            std::process::exit(3);
        }
    };

    let service_config: ServiceConfig = match config.try_deserialize() {
        Ok(sc) => sc,
        Err(e) => {
            error!(
                error = %e,
                "Could not deserialize service configuration; aborting. \
                 Fix the configuration and restart."
            );
            std::process::exit(3);
        }
    };

    if let Err(e) = service_config.validate() {
        error!(error = %e, "Service configuration is invalid; aborting");
        std::process::exit(3);
    }

    // -------------------------------------------------------------------------
    // Build the credential store
    //
    // A configured directory selects the filesystem store; without one,
    // credentials live in memory and do not survive a restart.
    // -------------------------------------------------------------------------
    let store: Arc<dyn CredentialStore> =
        match &service_config.credentials.directory {
            Some(directory) => {
                match FileCredentialStore::new(directory.into()).await {
                    Ok(store) => {
                        info!(directory = %directory, "Using filesystem credential store");
                        Arc::new(store)
                    }
                    Err(e) => {
                        error!(
                            directory = %directory,
                            error = %e,
                            "Failed to open credential store directory; aborting"
                        );
                        std::process::exit(4);
                    }
                }
            }
            None => {
                warn!(
                    "No credential store directory configured — using in-memory store. \
                     Stored credentials will not survive a restart."
                );
                Arc::new(InMemoryCredentialStore::new())
            }
        };

    // -------------------------------------------------------------------------
    // Populate the handler registry
    //
    // Registration conflicts are startup bugs; fail fast before binding.
    // -------------------------------------------------------------------------
    let mut registry = HandlerRegistry::new();
    if let Err(e) = handlers::register_all(&mut registry) {
        error!(error = %e, "Handler registration conflict; aborting");
        std::process::exit(5);
    }

    info!(
        handlers = registry.len(),
        types = ?registry.registered_types(),
        "Handler registry populated"
    );

    let verifier = Arc::new(SharedSecretVerifier::new(
        service_config.auth.shared_secret.clone(),
    ));

    let dispatcher = Arc::new(EventDispatcher::new(
        verifier,
        Arc::new(registry),
        store,
        service_config.webhook.handler_timeout(),
    ));

    info!(
        host = %service_config.server.host,
        port = service_config.server.port,
        endpoint = %service_config.webhook.endpoint_path,
        "Starting HTTP server"
    );

    // Start the server
    if let Err(e) = start_server(service_config, dispatcher).await {
        error!("Failed to start server: {}", e);

        let exit_code = match e {
            ServiceError::BindFailed { .. } => 1,
            ServiceError::ServerFailed { .. } => 2,
            ServiceError::Configuration(_) => 3,
        };

        std::process::exit(exit_code);
    }

    Ok(())
}
