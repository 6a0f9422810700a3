//! Outbound port: the relational projection store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use shared_types::{
    AccountId, AssetRecord, LedgerEvent, PassRecord, TopicId, World, WorldType,
};

use crate::errors::StoreError;

/// Fields of a world row staged ahead of consensus submission.
#[derive(Debug, Clone)]
pub struct WorldDraft {
    pub id: String,
    pub issuer_id: AccountId,
    pub name: String,
    pub world_type: WorldType,
    pub description: Option<String>,
}

/// Abstract interface to the relational projection.
///
/// The store is the single source of truth for "does this entity already
/// exist". Each `record_*` method is one transactional unit: the entity
/// write and the ledger-event insert commit together or not at all.
#[async_trait]
pub trait ProjectionStore: Send + Sync {
    /// Idempotency pre-check read: the pass owning a natural key, if any.
    async fn find_pass_by_natural_key(
        &self,
        world_id: &str,
        name: &str,
    ) -> Result<Option<PassRecord>, StoreError>;

    /// Current state of a world.
    async fn get_world(&self, world_id: &str) -> Result<Option<World>, StoreError>;

    /// Insert or refresh a world row at PENDING, ahead of submission.
    async fn upsert_world_pending(&self, draft: &WorldDraft) -> Result<(), StoreError>;

    /// Confirmed world publish: world row to LIVE plus its ledger event,
    /// atomically.
    async fn record_world_live(
        &self,
        world_id: &str,
        topic_id: &TopicId,
        published_at: DateTime<Utc>,
        event: &LedgerEvent,
    ) -> Result<(), StoreError>;

    /// Confirmed pass mint: pass row plus its ledger event, atomically.
    /// A natural-key violation is [`StoreError::Conflict`].
    async fn record_pass_minted(
        &self,
        pass: &PassRecord,
        event: &LedgerEvent,
    ) -> Result<(), StoreError>;

    /// Degraded pass mint: pass row with `submission_status = FAILED` and
    /// no ledger event. Conflicts map identically to the confirmed path.
    async fn record_pass_degraded(&self, pass: &PassRecord) -> Result<(), StoreError>;

    /// Confirmed asset inscription: asset row plus its ledger event,
    /// atomically.
    async fn record_asset_inscribed(
        &self,
        asset: &AssetRecord,
        event: &LedgerEvent,
    ) -> Result<(), StoreError>;

    /// Degraded asset inscription: asset row only. An asset with no
    /// matching ledger event is the unsynced marker on this path.
    async fn record_asset_degraded(&self, asset: &AssetRecord) -> Result<(), StoreError>;

    /// Append one receipt row (signal path: no entity row accompanies it).
    async fn insert_ledger_event(&self, event: &LedgerEvent) -> Result<(), StoreError>;

    /// Most recently recorded receipt, if any.
    async fn latest_ledger_event(&self) -> Result<Option<LedgerEvent>, StoreError>;
}
