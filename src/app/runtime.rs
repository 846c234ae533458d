use super::{DoorlockApp, ShutdownReason};
use crate::error::{DoorlockError, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::signal;
use tokio::task::JoinError;
use tracing::{error, info, warn};

enum Stop {
    Requested(ShutdownReason),
    ServerExited(std::result::Result<Result<()>, JoinError>),
}

impl DoorlockApp {
    /// Serve until SIGINT or SIGTERM, returning the process exit code
    pub async fn run(self) -> Result<i32> {
        self.run_until(wait_for_signal()).await
    }

    /// Serve until `shutdown` resolves or the server stops on its own
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<i32>
    where
        F: Future<Output = ShutdownReason>,
    {
        let listener = self
            .listener
            .take()
            .ok_or_else(|| DoorlockError::system("Listener already taken"))?;

        info!("Door lock service is running");

        let server = Arc::clone(&self.server);
        let token = self.cancellation_token.clone();
        let mut server_task = tokio::spawn(async move { server.serve(listener, token).await });

        let stop = tokio::select! {
            reason = shutdown => Stop::Requested(reason),
            joined = &mut server_task => Stop::ServerExited(joined),
        };

        match stop {
            Stop::Requested(reason) => {
                info!("Shutdown initiated: {:?}", reason);
                self.shutdown(server_task).await
            }
            Stop::ServerExited(joined) => {
                let reason = match joined {
                    Ok(Ok(())) => ShutdownReason::Error("Server exited unexpectedly".to_string()),
                    Ok(Err(e)) => ShutdownReason::Error(e.to_string()),
                    Err(e) => ShutdownReason::Error(format!("Server task failed: {}", e)),
                };
                error!("Door lock server stopped: {:?}", reason);
                Ok(1)
            }
        }
    }
}

/// Wait for SIGTERM (systemd stop) or SIGINT (Ctrl+C)
async fn wait_for_signal() -> ShutdownReason {
    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM signal");
                        return ShutdownReason::Signal("SIGTERM".to_string());
                    }
                    _ = signal::ctrl_c() => {
                        info!("Received SIGINT signal (Ctrl+C)");
                        return ShutdownReason::Signal("SIGINT".to_string());
                    }
                }
            }
            Err(e) => warn!("Failed to register SIGTERM handler: {}", e),
        }
    }

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Received SIGINT signal (Ctrl+C)");
            ShutdownReason::Signal("SIGINT".to_string())
        }
        Err(e) => {
            error!("Failed to listen for Ctrl+C: {}", e);
            ShutdownReason::Error(e.to_string())
        }
    }
}
