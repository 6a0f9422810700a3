//! Idempotency guard.
//!
//! Pre-submission duplicate detection on the caller's logical identity
//! (world + pass name). An optimization to avoid spending a consensus call
//! on a known duplicate, NOT a correctness guarantee: the check-then-act
//! window stays open under concurrency, and the store's unique constraint
//! is the authoritative dedupe boundary.

use std::sync::Arc;

use tracing::debug;

use shared_types::PassRecord;
use wl_02_projection::{ProjectionStore, StoreError};

/// Result of the pre-check.
#[derive(Debug, Clone)]
pub enum GuardDecision {
    /// A record with this natural key already exists; short-circuit and
    /// return its identifiers verbatim.
    Found(PassRecord),
    /// No duplicate seen; proceed to submission.
    NotFound,
}

/// Natural-key duplicate detector over the projection store.
pub struct IdempotencyGuard {
    store: Arc<dyn ProjectionStore>,
}

impl IdempotencyGuard {
    pub fn new(store: Arc<dyn ProjectionStore>) -> Self {
        Self { store }
    }

    /// Look for an existing pass with the same world + name.
    pub async fn check_pass(
        &self,
        world_id: &str,
        name: &str,
    ) -> Result<GuardDecision, StoreError> {
        match self.store.find_pass_by_natural_key(world_id, name).await? {
            Some(existing) => {
                debug!(
                    world_id,
                    name,
                    pass_id = %existing.id,
                    event_id = %existing.event_id,
                    "Idempotency hit: returning existing pass"
                );
                Ok(GuardDecision::Found(existing))
            }
            None => Ok(GuardDecision::NotFound),
        }
    }
}
