//! # Shared Types
//!
//! Domain types shared across the World-Ledger subsystems.
//!
//! ## Clusters
//!
//! - **Envelope**: [`Envelope`], [`EnvelopeKind`], [`Operation`] - the
//!   canonical record of one state-changing intent.
//! - **Payloads**: [`EnvelopePayload`] and its per-kind payload records.
//! - **Projection**: [`World`], [`PassRecord`], [`AssetRecord`],
//!   [`LedgerEvent`] - the relational current-state view.
//! - **Identifiers**: [`AccountId`], [`TopicId`], [`ContentHash`].
//! - **Errors**: [`ValidationError`], [`ConfigurationError`].

pub mod entities;
pub mod envelope;
pub mod errors;
pub mod ids;
pub mod payload;

pub use entities::{
    AssetRecord, LedgerEvent, PassRecord, Receipt, SubmissionStatus, World, WorldStatus,
};
pub use envelope::{Envelope, EnvelopeKind, Operation, WireEnvelope, APP_ID};
pub use errors::{ConfigurationError, ValidationError};
pub use ids::{AccountId, ContentHash, TopicId};
pub use payload::{
    ContentPayload, DropKind, DropRequirements, EnvelopePayload, MetaOp, MetaPayload, PassPayload,
    PassStatus, PassSupply, RequirementAction, SignalData, SignalPayload, SignalType, Visibility,
    WorldProfile, WorldType,
};
