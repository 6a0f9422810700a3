//! # Error Types
//!
//! The shared halves of the error taxonomy. Validation and configuration
//! failures never reach the consensus or projection layers; the subsystem
//! crates define their own store/submit errors on top of these.

use thiserror::Error;

use crate::envelope::EnvelopeKind;

/// Malformed input. Always recoverable by the caller correcting the
/// request; never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Entity (world) identifier is empty.
    #[error("Entity id must not be empty")]
    EmptyEntityId,

    /// Account reference does not match the `shard.realm.num` grammar.
    #[error("Invalid account id {value:?} (expected shard.realm.num, e.g. 0.0.1001)")]
    InvalidAccountId { value: String },

    /// A required payload sub-field is missing or empty.
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// A free-text field exceeds its length budget.
    #[error("Field {field} exceeds {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    /// Finite supply declared without a usable cap.
    #[error("Finite supply requires a cap of at least 1")]
    InvalidSupply,

    /// Content digest string is not `sha256:<64 hex>`.
    #[error("Invalid content hash {value:?}")]
    InvalidContentHash { value: String },
}

/// Missing channel mapping or a tripped environment guard. Fatal for the
/// request and not user-actionable; surfaced as a server-side error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No topic configured for a required envelope kind (and no default).
    #[error("No topic configured for envelope kind {kind}")]
    TopicNotConfigured { kind: EnvelopeKind },

    /// The target network is the live one and submissions are disabled.
    #[error("Submissions are disabled on the {network} network")]
    SubmissionsDisabled { network: String },

    /// A required environment variable is absent.
    #[error("Missing environment variable: {key}")]
    MissingEnv { key: String },

    /// Configuration present but unusable.
    #[error("Invalid configuration: {reason}")]
    Invalid { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::InvalidAccountId {
            value: "not-an-id".to_string(),
        };
        assert!(err.to_string().contains("not-an-id"));
    }

    #[test]
    fn test_configuration_error_display() {
        let err = ConfigurationError::TopicNotConfigured {
            kind: EnvelopeKind::Pass,
        };
        assert!(err.to_string().contains("WORLD_PASS"));
    }
}
