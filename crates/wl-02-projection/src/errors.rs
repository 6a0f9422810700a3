//! Store error types.

use thiserror::Error;

/// Errors from the projection store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. For pass mints this is the
    /// natural-key race lost after an idempotency-check miss; callers map
    /// it to a conflict response, never to a silent replay.
    #[error("Conflict on constraint {constraint}")]
    Conflict { constraint: String },

    /// The database could not execute the operation.
    #[error("Database error: {message}")]
    Database { message: String },

    /// A stored row no longer decodes into its entity type.
    #[error("Row decode error: {message}")]
    RowDecode { message: String },

    /// The referenced entity does not exist.
    #[error("Not found: {entity}")]
    NotFound { entity: String },
}

impl StoreError {
    /// True when the error is the natural-key uniqueness violation.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
