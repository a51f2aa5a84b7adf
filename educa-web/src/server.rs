//! Educa Web Server
//!
//! Main web server implementation using Axum.

use crate::{create_app, AppState, WebError, WebResult};
use axum::serve;
use educa_core::EducaConfig;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Main Educa web server
pub struct EducaServer {
    config: EducaConfig,
    state: AppState,
}

impl EducaServer {
    /// Create a new server, validating the configuration and opening storage
    pub async fn new(config: EducaConfig) -> WebResult<Self> {
        config.validate()?;
        let state = AppState::new(config.clone()).await?;

        Ok(Self { config, state })
    }

    /// Start the web server and run until Ctrl-C
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.address();

        info!("Starting Educa Web Server");
        info!(
            "Storage: {}",
            self.config
                .storage
                .database_url
                .as_deref()
                .unwrap_or("in-memory")
        );

        let app = create_app(self.state.clone());

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        info!("Server listening on http://{}", address);

        if let Err(e) = serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!("Server error: {}", e);
            return Err(WebError::Server(e));
        }

        info!("Server shut down gracefully");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &EducaConfig {
        &self.config
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
