//! Submission error types.

use thiserror::Error;

/// A failed consensus submission. The external log has no side effect for
/// any of these; local bookkeeping is the orchestrator's call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsensusError {
    /// The log could not be reached.
    #[error("Consensus log unreachable: {message}")]
    Unavailable { message: String },

    /// The log rejected the message.
    #[error("Consensus log rejected message: {message}")]
    Rejected { message: String },

    /// The round trip exceeded the configured bound. Treated identically
    /// to any other failure: no partial application.
    #[error("Consensus submission timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}
