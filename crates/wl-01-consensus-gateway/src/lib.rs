//! # Consensus Gateway Subsystem (wl-01)
//!
//! The system's only doorway to the external consensus log. Resolves the
//! logical channel for an envelope kind and hands the serialized, sealed
//! envelope to the log in exactly one network attempt.
//!
//! ## Responsibilities
//!
//! - Route envelope kinds to configured topics (with a shared default
//!   fallback); an unroutable kind is a fatal configuration error.
//! - Perform the single submission round trip, bounded by a timeout.
//! - Return the ordering receipt (sequence number, consensus timestamp,
//!   transaction reference) or a typed failure.
//!
//! ## Non-responsibilities
//!
//! Retry policy belongs to the orchestrator (wl-03), which chooses to
//! degrade rather than retry. The vendor SDK adapter lives outside this
//! workspace; [`ConsensusLogClient`] is the contract it must satisfy.
//!
//! ## Hexagonal Architecture
//!
//! - **Domain** (`domain/`): topic registry, submission errors
//! - **Ports** (`ports/`): the outbound `ConsensusLogClient` SPI
//! - **Adapters** (`adapters/`): in-memory log for tests and local runs
//! - **Service** (`service.rs`): the timeout-bounded submitter

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryConsensusLog, SubmittedMessage};
pub use domain::{ConsensusError, TopicRegistry};
pub use ports::ConsensusLogClient;
pub use service::ConsensusSubmitter;
