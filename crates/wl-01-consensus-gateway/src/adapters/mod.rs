//! Adapters layer: consensus log implementations.

pub mod memory;

pub use memory::{InMemoryConsensusLog, SubmittedMessage};
