//! Request outcomes and errors.
//!
//! The two-outcome consensus result is modeled as distinct terminal
//! variants rather than a caught error with a side-effecting flag: a
//! degraded submission is a success-with-warning, never a request failure.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use shared_crypto::CanonicalizeError;
use shared_types::{
    ConfigurationError, ContentHash, PassStatus, Receipt, TopicId, ValidationError,
};
use wl_02_projection::StoreError;

/// Phases of the per-request state machine, for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Received,
    Validated,
    IdempotentHit,
    Hashed,
    Submitting,
    Submitted,
    SubmitFailed,
    Projecting,
    ProjectingDegraded,
    Done,
    DoneWithWarning,
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "RECEIVED",
            Self::Validated => "VALIDATED",
            Self::IdempotentHit => "IDEMPOTENT_HIT",
            Self::Hashed => "HASHED",
            Self::Submitting => "SUBMITTING",
            Self::Submitted => "SUBMITTED",
            Self::SubmitFailed => "SUBMIT_FAILED",
            Self::Projecting => "PROJECTING",
            Self::ProjectingDegraded => "PROJECTING_DEGRADED",
            Self::Done => "DONE",
            Self::DoneWithWarning => "DONE_WITH_WARNING",
        };
        f.write_str(name)
    }
}

/// The confirmed half of any outcome: where the envelope landed.
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    pub topic_id: TopicId,
    pub receipt: Receipt,
    pub content_hash: ContentHash,
    pub event_id: String,
}

/// Outcome of a world-meta or drop-announce request.
#[derive(Debug, Clone)]
pub enum PublishOutcome {
    /// Consensus accepted; projection is consistent.
    Published(SubmitReceipt),
    /// Consensus failed; local state (where any exists) carries the
    /// degraded marker and awaits reconciliation.
    Degraded { event_id: String, reason: String },
}

/// Outcome of a pass-mint request.
#[derive(Debug, Clone)]
pub enum MintOutcome {
    /// Fresh mint, consensus confirmed.
    Minted {
        pass_id: Uuid,
        receipt: SubmitReceipt,
    },
    /// Fresh mint persisted locally, consensus submission failed.
    Degraded {
        pass_id: Uuid,
        event_id: String,
        reason: String,
    },
    /// Recognized duplicate intent: the original identifiers, verbatim.
    Replayed {
        pass_id: Uuid,
        status: PassStatus,
        event_id: String,
    },
}

/// Outcome of an asset-inscribe request.
#[derive(Debug, Clone)]
pub enum InscribeOutcome {
    Inscribed {
        content_id: String,
        receipt: SubmitReceipt,
    },
    Degraded {
        content_id: String,
        event_id: String,
        reason: String,
    },
}

/// A request that could not complete. Consensus failures are deliberately
/// absent: they degrade, they do not fail.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Natural-key race lost after an idempotency-check miss.
    #[error("Pass {name:?} already exists in world {world_id}")]
    Conflict { world_id: String, name: String },

    #[error("Projection store failure: {0}")]
    Store(StoreError),

    #[error("Envelope serialization failure: {0}")]
    Canonicalize(#[from] CanonicalizeError),
}

impl RequestError {
    /// Fold a store error into the request taxonomy, attaching the natural
    /// key when the conflict boundary fired.
    pub fn from_store(err: StoreError, world_id: &str, name: &str) -> Self {
        if err.is_conflict() {
            Self::Conflict {
                world_id: world_id.to_string(),
                name: name.to_string(),
            }
        } else {
            Self::Store(err)
        }
    }
}
