//! Ports layer: the outbound consensus log SPI.

pub mod outbound;

pub use outbound::ConsensusLogClient;
