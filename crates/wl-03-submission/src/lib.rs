//! # Submission Subsystem (wl-03)
//!
//! The per-request coordinator. Composes envelope construction,
//! canonicalization/hashing, the idempotency guard, the consensus
//! submitter, and the projection writer, and decides what the caller sees.
//!
//! ## Request State Machine
//!
//! ```text
//! RECEIVED → VALIDATED → (IDEMPOTENT_HIT → RETURN)
//!                      → HASHED → SUBMITTING → (SUBMITTED → PROJECTING → DONE)
//!                                            → (SUBMIT_FAILED → PROJECTING_DEGRADED → DONE_WITH_WARNING)
//! ```
//!
//! The environment guard runs before everything else: when the target
//! network is the live one, the request dies before any store or network
//! call. Consensus failures are never request failures - the projection
//! write still runs and the outcome carries the degraded marker.

pub mod config;
pub mod guard;
pub mod intents;
pub mod outcome;
pub mod service;

pub use config::{Network, SubmissionConfig};
pub use guard::{GuardDecision, IdempotencyGuard};
pub use intents::{
    AssetInscribeIntent, AssetMeta, AssetUrls, DropAnnounceIntent, DropDetails, PassDetails,
    PassMintIntent, WorldMetaIntent,
};
pub use outcome::{
    InscribeOutcome, MintOutcome, PublishOutcome, RequestError, RequestPhase, SubmitReceipt,
};
pub use service::SubmissionOrchestrator;
