//! # API Gateway Subsystem (wl-04)
//!
//! The HTTP surface over the submission orchestrator.
//!
//! ## Endpoints
//!
//! - `POST /intents/world-meta` - publish or update a world profile
//! - `POST /intents/pass-mint` - mint a membership pass (idempotent)
//! - `POST /intents/asset-inscribe` - inscribe pre-staged media
//! - `POST /intents/drop-announce` - broadcast a drop signal
//! - `GET /ledger/latest` - most recent consensus receipt (debug)
//! - `GET /health` - liveness
//!
//! ## Status mapping
//!
//! Validation → 400, disabled network → 403, natural-key conflict → 409,
//! other configuration/store failures → 500. Degraded submissions are 200
//! with a `warning` field: local availability is preserved when the
//! consensus log is down.

pub mod domain;
pub mod handlers;
pub mod router;
pub mod service;

pub use domain::config::GatewayConfig;
pub use domain::error::ApiError;
pub use router::{build_router, AppState};
pub use service::ApiGatewayService;
