//! Router assembly.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use wl_03_submission::SubmissionOrchestrator;

use crate::domain::config::GatewayConfig;
use crate::handlers;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SubmissionOrchestrator>,
}

/// Build the gateway router with its middleware stack.
pub fn build_router(state: AppState, config: &GatewayConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route("/intents/world-meta", post(handlers::world_meta))
        .route("/intents/pass-mint", post(handlers::pass_mint))
        .route("/intents/asset-inscribe", post(handlers::asset_inscribe))
        .route("/intents/drop-announce", post(handlers::drop_announce))
        .route("/ledger/latest", get(handlers::ledger_latest))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(DefaultBodyLimit::max(config.max_request_bytes));

    if config.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}
