//! # Projection Subsystem (wl-02)
//!
//! Mirrors accepted envelopes into the relational current-state view and
//! the append-only receipt table, one transactional unit per
//! request-outcome.
//!
//! ## Invariants
//!
//! - A confirmed outcome writes the entity row and its ledger event
//!   atomically: both or neither.
//! - A degraded outcome writes the entity row with an explicit FAILED
//!   marker and no ledger event.
//! - `world_ledger_events` is append-only: no update or delete path exists
//!   in this crate.
//! - The `UNIQUE(world_id, name)` constraint on passes is the authoritative
//!   dedupe boundary; violations surface as [`StoreError::Conflict`], a
//!   typed result, never as vendor error-code inspection at call sites.
//!
//! ## Hexagonal Architecture
//!
//! - **Ports** (`ports/`): the outbound `ProjectionStore` SPI
//! - **Adapters** (`adapters/`): Postgres (sqlx) and in-memory stores
//! - **Schema** (`schema.rs`): DDL and startup migration

pub mod adapters;
pub mod errors;
pub mod ports;
pub mod schema;

pub use adapters::{InMemoryProjectionStore, PgProjectionStore};
pub use errors::StoreError;
pub use ports::{ProjectionStore, WorldDraft};
