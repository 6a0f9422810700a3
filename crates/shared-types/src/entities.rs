//! # Projection Entities
//!
//! The mutable current-state view mirrored from accepted envelopes, plus
//! the immutable receipt record.
//!
//! ## Clusters
//!
//! - **Worlds**: [`World`], [`WorldStatus`]
//! - **Passes**: [`PassRecord`], [`SubmissionStatus`]
//! - **Assets**: [`AssetRecord`]
//! - **Ledger**: [`LedgerEvent`], [`Receipt`]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::envelope::EnvelopeKind;
use crate::ids::{AccountId, ContentHash, TopicId};
use crate::payload::{PassStatus, PassSupply, WorldType};

/// Lifecycle of a world's projection row.
///
/// `Draft` is local-only; `Pending` has an in-flight publish; `Live` has a
/// consensus receipt on record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorldStatus {
    Draft,
    Pending,
    Live,
}

impl WorldStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Pending => "PENDING",
            Self::Live => "LIVE",
        }
    }
}

/// Current state of a world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub id: String,
    pub issuer_id: AccountId,
    pub name: String,
    pub world_type: WorldType,
    pub description: Option<String>,
    pub status: WorldStatus,
    pub topic_id: Option<TopicId>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome marker for the consensus half of a projected row.
///
/// `Failed` marks a created-but-unsynced record awaiting reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Pending,
    Confirmed,
    Failed,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Failed => "FAILED",
        }
    }
}

/// Current state of a minted pass definition.
///
/// Natural key: `(world_id, name)` - at most one live pass per name within
/// a world, enforced by the store's unique constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassRecord {
    pub id: Uuid,
    pub world_id: String,
    pub issuer_id: AccountId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub supply: PassSupply,
    pub status: PassStatus,
    /// Audit link back to the originating envelope.
    pub event_id: String,
    pub submission_status: SubmissionStatus,
    pub topic_id: Option<TopicId>,
    pub sequence_number: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An inscribed media asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: String,
    pub world_id: String,
    pub issuer_id: AccountId,
    /// Coarse class from the mime type ("image", "audio", "video").
    pub asset_type: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub content_hash: ContentHash,
    pub created_at: DateTime<Utc>,
}

/// Immutable receipt record, one row per accepted submission.
///
/// Append-only: rows are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub id: Uuid,
    pub entity_id: String,
    pub topic_id: TopicId,
    pub event_type: EnvelopeKind,
    pub sequence_number: u64,
    pub consensus_timestamp: String,
    pub tx_ref: String,
    pub content_hash: ContentHash,
    pub created_at: DateTime<Utc>,
}

impl LedgerEvent {
    /// Assemble the receipt row for an accepted envelope.
    pub fn from_receipt(
        entity_id: impl Into<String>,
        topic_id: TopicId,
        event_type: EnvelopeKind,
        receipt: &Receipt,
        content_hash: ContentHash,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity_id: entity_id.into(),
            topic_id,
            event_type,
            sequence_number: receipt.sequence_number,
            consensus_timestamp: receipt.consensus_timestamp.clone(),
            tx_ref: receipt.transaction_ref.clone(),
            content_hash,
            created_at,
        }
    }
}

/// Ordering receipt returned by the consensus log for one accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Position in the log's total order.
    pub sequence_number: u64,
    /// Consensus-assigned timestamp, as reported by the log.
    pub consensus_timestamp: String,
    /// Opaque transaction reference for explorers/support.
    pub transaction_ref: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_event_from_receipt() {
        let receipt = Receipt {
            sequence_number: 42,
            consensus_timestamp: "1700000000.000000001".to_string(),
            transaction_ref: "0.0.1001@1700000000.0".to_string(),
        };
        let event = LedgerEvent::from_receipt(
            "w1",
            TopicId::new("0.0.5005"),
            EnvelopeKind::Pass,
            &receipt,
            ContentHash::from_digest([7; 32]),
            Utc::now(),
        );
        assert_eq!(event.entity_id, "w1");
        assert_eq!(event.sequence_number, 42);
        assert_eq!(event.tx_ref, receipt.transaction_ref);
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(WorldStatus::Live.as_str(), "LIVE");
        assert_eq!(SubmissionStatus::Failed.as_str(), "FAILED");
        let json = serde_json::to_string(&SubmissionStatus::Confirmed).unwrap();
        assert_eq!(json, "\"CONFIRMED\"");
    }
}
