//! Adapters layer: projection store implementations.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryProjectionStore;
pub use postgres::PgProjectionStore;
