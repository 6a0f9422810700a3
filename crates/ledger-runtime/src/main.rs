//! # World-Ledger Runtime
//!
//! The main entry point for the write-path service.
//!
//! ## Startup Sequence
//!
//! 1. Initialize structured logging (env-filter)
//! 2. Load configuration from environment (fail closed on missing topics
//!    or database URL)
//! 3. Construct the Postgres pool (explicit lifecycle: init here, closed
//!    on shutdown)
//! 4. Apply the projection schema migration
//! 5. Wire adapters into the submission orchestrator
//! 6. Serve the API gateway until SIGINT
//!
//! The consensus vendor adapter is injected at the [`ConsensusLogClient`]
//! port. This binary wires the in-memory log so local stacks run without
//! vendor credentials; a deployment substitutes the SDK-backed client at
//! the same seam.

mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wl_01_consensus_gateway::{ConsensusLogClient, InMemoryConsensusLog};
use wl_02_projection::{schema, PgProjectionStore, ProjectionStore};
use wl_03_submission::SubmissionOrchestrator;
use wl_04_api_gateway::ApiGatewayService;

use crate::config::RuntimeConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = RuntimeConfig::from_env().context("Failed to load runtime configuration")?;
    info!(
        network = %config.submission.network,
        addr = %config.gateway.addr(),
        "Starting World-Ledger runtime"
    );

    // Pooled connection to the relational store: process-wide resource
    // with explicit acquire/release discipline.
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to Postgres")?;

    schema::migrate(&pool)
        .await
        .context("Failed to apply projection schema")?;
    info!("Projection schema ready");

    let store: Arc<dyn ProjectionStore> = Arc::new(PgProjectionStore::new(pool.clone()));
    let consensus: Arc<dyn ConsensusLogClient> = Arc::new(InMemoryConsensusLog::new());

    let orchestrator = Arc::new(SubmissionOrchestrator::new(
        config.submission.clone(),
        consensus,
        config.topics.clone(),
        store,
    ));

    let mut gateway = ApiGatewayService::new(config.gateway.clone(), orchestrator)
        .context("Failed to construct API gateway")?;

    tokio::select! {
        result = gateway.start() => {
            result.context("API gateway terminated unexpectedly")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    pool.close().await;
    info!("World-Ledger runtime stopped");
    Ok(())
}
