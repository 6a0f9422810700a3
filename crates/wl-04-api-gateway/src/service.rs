//! API Gateway service - server lifecycle.

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::info;

use shared_types::ConfigurationError;
use wl_03_submission::SubmissionOrchestrator;

use crate::domain::config::GatewayConfig;
use crate::router::{build_router, AppState};

/// Owns the HTTP listener and its shutdown channel.
pub struct ApiGatewayService {
    config: GatewayConfig,
    state: AppState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiGatewayService {
    /// Create a new gateway service over a wired orchestrator.
    pub fn new(
        config: GatewayConfig,
        orchestrator: Arc<SubmissionOrchestrator>,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self {
            config,
            state: AppState { orchestrator },
            shutdown_tx: None,
        })
    }

    /// Bind and serve until [`Self::shutdown`] fires or the task is aborted.
    pub async fn start(&mut self) -> std::io::Result<()> {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.shutdown_tx = Some(shutdown_tx);

        let addr = self.config.addr();
        let router = build_router(self.state.clone(), &self.config);

        info!(addr = %addr, "Starting API gateway");
        let listener = tokio::net::TcpListener::bind(addr).await?;

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
                info!("API gateway shutting down");
            })
            .await
    }

    /// Request a graceful shutdown. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
