use crate::{
    config::ServerConfig,
    door::DoorStateService,
    error::{DoorlockError, Result},
};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers::{
    device_status_handler, lock_handler, not_found_handler, state_handler, status_page_handler,
    unlock_handler,
};

/// Largest device status push that is buffered and decoded
pub const DEVICE_PUSH_BODY_LIMIT: usize = 64 * 1024;

/// Shared state for the Axum server
#[derive(Clone)]
pub struct ServerState {
    pub(crate) service: Arc<DoorStateService>,
}

/// HTTP front of the door state service
pub struct DoorServer {
    pub(crate) config: ServerConfig,
    pub(crate) service: Arc<DoorStateService>,
}

impl DoorServer {
    /// Create a new server around a shared service handle
    pub fn new(config: ServerConfig, service: Arc<DoorStateService>) -> Self {
        Self { config, service }
    }

    /// Build the router for the HTTP surface.
    ///
    /// Every known path also gets a method fallback so that a request with the
    /// wrong method is answered like an unknown path rather than with 405.
    pub fn router(&self) -> Router {
        let state = ServerState {
            service: Arc::clone(&self.service),
        };

        Router::new()
            .route("/", get(status_page_handler).fallback(not_found_handler))
            .route(
                "/car/status",
                get(status_page_handler).fallback(not_found_handler),
            )
            .route(
                "/api/car/state",
                get(state_handler).fallback(not_found_handler),
            )
            .route("/lock", post(lock_handler).fallback(not_found_handler))
            .route("/unlock", post(unlock_handler).fallback(not_found_handler))
            .route(
                "/api/car/status",
                post(device_status_handler)
                    .fallback(not_found_handler)
                    .layer(DefaultBodyLimit::max(DEVICE_PUSH_BODY_LIMIT)),
            )
            .fallback(not_found_handler)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the configured listening address
    pub async fn bind(&self) -> Result<TcpListener> {
        let addr = self.config.bind_address();

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| DoorlockError::Bind {
                address: addr.clone(),
                source: e,
            })?;

        info!("Door lock server listening on {}", addr);
        Ok(listener)
    }

    /// Serve requests on `listener` until `shutdown` is cancelled
    pub async fn serve(&self, listener: TcpListener, shutdown: CancellationToken) -> Result<()> {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await
            .map_err(|e| DoorlockError::server(format!("Server error: {}", e)))?;

        info!("Door lock server stopped");
        Ok(())
    }

    /// Bind and serve in one step
    pub async fn start(&self, shutdown: CancellationToken) -> Result<()> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }
}

/// Door server builder for configuration
pub struct DoorServerBuilder {
    config: Option<ServerConfig>,
    service: Option<Arc<DoorStateService>>,
}

impl DoorServerBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            service: None,
        }
    }

    /// Set the server configuration
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the door state service handle
    pub fn service(mut self, service: Arc<DoorStateService>) -> Self {
        self.service = Some(service);
        self
    }

    /// Build the door server
    pub fn build(self) -> Result<DoorServer> {
        let config = self
            .config
            .ok_or_else(|| DoorlockError::server("Server configuration is required"))?;

        let service = self
            .service
            .ok_or_else(|| DoorlockError::server("Door state service is required"))?;

        Ok(DoorServer::new(config, service))
    }
}

impl Default for DoorServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
