//! Ports layer: the outbound projection store SPI.

pub mod outbound;

pub use outbound::{ProjectionStore, WorldDraft};
