use super::DoorlockApp;
use crate::error::Result;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{error, info};

const SERVER_STOP_TIMEOUT: Duration = Duration::from_secs(10);

impl DoorlockApp {
    /// Stop accepting requests, let in-flight ones finish and report the exit code
    pub(super) async fn shutdown(&self, server_task: JoinHandle<Result<()>>) -> Result<i32> {
        info!("Beginning graceful shutdown");

        self.cancellation_token.cancel();

        let exit_code = match timeout(SERVER_STOP_TIMEOUT, server_task).await {
            Ok(Ok(Ok(()))) => 0,
            Ok(Ok(Err(e))) => {
                error!("Error stopping server: {}", e);
                1
            }
            Ok(Err(e)) => {
                error!("Server task failed during shutdown: {}", e);
                1
            }
            Err(_) => {
                error!("Server stop timeout");
                1
            }
        };

        let status = self.service.status();
        info!(
            "Final door state {} (device reported: {})",
            status.door, status.device.reported
        );
        info!("Graceful shutdown completed with exit code: {}", exit_code);
        Ok(exit_code)
    }
}
