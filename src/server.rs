//! HTTP server wiring and lifecycle.
//!
//! Serves the JSON API under `/api/db` together with the embedded browser
//! UI at the root, and shuts down gracefully on SIGINT or SIGTERM.

use crate::api::{self, AppState};
use crate::error::{ApiError, ApiResult};
use crate::web;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

/// The pg-studio HTTP server.
pub struct Server {
    state: AppState,
    /// Host to bind to
    host: String,
    /// Port to bind to
    port: u16,
}

impl Server {
    pub fn new(state: AppState, host: impl Into<String>, port: u16) -> Self {
        Self {
            state,
            host: host.into(),
            port,
        }
    }

    /// Get the bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Serve until a shutdown signal arrives. In-flight requests get a
    /// bounded window to finish; the connection pool is closed on the
    /// way out.
    pub async fn run(&self) -> ApiResult<()> {
        let bind_addr = self.bind_addr();
        let manager = self.state.manager.clone();

        let app = api::router(self.state.clone()).merge(web::router());

        let listener = TcpListener::bind(&bind_addr).await.map_err(|e| {
            ApiError::internal(format!(
                "Failed to bind to {}: {} (is the port available?)",
                bind_addr, e
            ))
        })?;

        info!("pg-studio listening on http://{}", bind_addr);
        if self.state.preview {
            info!("Preview mode enabled, serving the mock catalog");
        }

        // Ad-hoc queries carry no application-level timeout, so an in-flight
        // statement may keep the server alive indefinitely; force exit after
        // a timeout once the shutdown signal is received
        const GRACEFUL_TIMEOUT: Duration = Duration::from_secs(30);

        let shutdown_notify = Arc::new(tokio::sync::Notify::new());
        let shutdown_notify_clone = shutdown_notify.clone();

        let shutdown_signal = async move {
            wait_for_signal().await;
            shutdown_notify_clone.notify_one();
        };

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal);

        // Race between the server completing normally and a forced
        // timeout/second signal after shutdown was requested
        tokio::select! {
            result = server => {
                match result {
                    Ok(()) => info!("HTTP server stopped"),
                    Err(e) => {
                        error!(error = %e, "HTTP server error");
                        return Err(ApiError::internal(format!("HTTP server error: {}", e)));
                    }
                }
            }
            _ = async {
                shutdown_notify.notified().await;
                info!(
                    timeout_secs = GRACEFUL_TIMEOUT.as_secs(),
                    "Waiting for requests to finish (send signal again to force exit)..."
                );

                tokio::select! {
                    _ = tokio::time::sleep(GRACEFUL_TIMEOUT) => {
                        warn!("Graceful shutdown timeout, forcing exit");
                    }
                    _ = wait_for_signal() => {
                        warn!("Received second signal, forcing immediate exit");
                    }
                }
            } => {}
        }

        info!("Closing database connections");
        manager.close().await;

        Ok(())
    }
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn wait_for_signal() {
    let ctrl_c = signal::ctrl_c();

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
