use crate::config::DoorlockConfig;
use crate::door::DoorStateService;
use crate::error::{DoorlockError, Result};
use crate::web::DoorServer;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Owns the door state service for the lifetime of the process and runs the
/// HTTP server in front of it
pub struct DoorlockApp {
    pub(super) config: DoorlockConfig,
    pub(super) service: Arc<DoorStateService>,
    pub(super) server: Arc<DoorServer>,
    pub(super) listener: Option<TcpListener>,
    pub(super) cancellation_token: CancellationToken,
}

impl DoorlockApp {
    /// Create the service and bind the configured listening address
    pub async fn new(config: DoorlockConfig) -> Result<Self> {
        let service = Arc::new(DoorStateService::new());
        let server = Arc::new(DoorServer::new(
            config.server.clone(),
            Arc::clone(&service),
        ));

        let listener = server.bind().await?;

        info!(
            "Door state initialised as {}, waiting for {} at {}",
            service.door_state(),
            config.device.name,
            config.device.address
        );

        Ok(Self {
            config,
            service,
            server,
            listener: Some(listener),
            cancellation_token: CancellationToken::new(),
        })
    }

    /// Handle to the shared door state service
    pub fn service(&self) -> Arc<DoorStateService> {
        Arc::clone(&self.service)
    }

    pub fn config(&self) -> &DoorlockConfig {
        &self.config
    }

    /// Address the server is bound to, useful when configured with port 0
    pub fn local_addr(&self) -> Result<SocketAddr> {
        let listener = self
            .listener
            .as_ref()
            .ok_or_else(|| DoorlockError::system("Listener already handed to the server"))?;
        Ok(listener.local_addr()?)
    }
}
