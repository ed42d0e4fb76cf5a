//! PG Studio - Main entry point.
//!
//! Starts the HTTP server that serves the admin console UI and its JSON API.

use clap::Parser;
use pg_studio::api::AppState;
use pg_studio::config::Config;
use pg_studio::db::ConnectionManager;
use pg_studio::server::Server;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    init_tracing(&config);

    if let Err(message) = config.validate() {
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }

    info!("Starting PG Studio v{}", env!("CARGO_PKG_VERSION"));

    let manager = ConnectionManager::new(config.pool_settings());

    // A preconfigured URL connects up front; failure leaves the server
    // running so the UI form can still establish a connection.
    if let Some(url) = &config.database_url {
        if config.preview {
            warn!("--database-url is ignored in preview mode");
        } else {
            match manager.connect_url(url).await {
                Ok(()) => info!("Connected to preconfigured database"),
                Err(e) => {
                    warn!(error = %e, "Startup connection failed, waiting for the UI form")
                }
            }
        }
    }

    let state = AppState::new(manager, config.preview);
    let server = Server::new(state, &config.http_host, config.http_port);

    if let Err(e) = server.run().await {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
