//! In-memory projection store.
//!
//! Test double enforcing the same constraints as the Postgres schema:
//! unique `(world_id, name)` and unique `event_id` on passes, append-only
//! ledger events. Tracks call counts so tests can assert that guarded
//! requests never touch the store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use shared_types::{
    AssetRecord, LedgerEvent, PassRecord, TopicId, World, WorldStatus,
};

use crate::errors::StoreError;
use crate::ports::{ProjectionStore, WorldDraft};

#[derive(Default)]
struct StoreState {
    worlds: HashMap<String, World>,
    passes: Vec<PassRecord>,
    assets: Vec<AssetRecord>,
    events: Vec<LedgerEvent>,
    calls: usize,
}

impl StoreState {
    fn check_pass_constraints(&self, pass: &PassRecord) -> Result<(), StoreError> {
        if self
            .passes
            .iter()
            .any(|p| p.world_id == pass.world_id && p.name == pass.name)
        {
            return Err(StoreError::Conflict {
                constraint: "unique_pass_name_per_world".to_string(),
            });
        }
        if self.passes.iter().any(|p| p.event_id == pass.event_id) {
            return Err(StoreError::Conflict {
                constraint: "world_passes_event_id_key".to_string(),
            });
        }
        Ok(())
    }
}

/// In-memory [`ProjectionStore`].
#[derive(Default)]
pub struct InMemoryProjectionStore {
    state: Mutex<StoreState>,
}

impl InMemoryProjectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations observed, successful or not.
    pub fn call_count(&self) -> usize {
        self.state.lock().calls
    }

    /// Snapshot of all pass rows.
    pub fn passes(&self) -> Vec<PassRecord> {
        self.state.lock().passes.clone()
    }

    /// Snapshot of all asset rows.
    pub fn assets(&self) -> Vec<AssetRecord> {
        self.state.lock().assets.clone()
    }

    /// Snapshot of all ledger-event rows, in insertion order.
    pub fn ledger_events(&self) -> Vec<LedgerEvent> {
        self.state.lock().events.clone()
    }

    /// Snapshot of a world row.
    pub fn world(&self, id: &str) -> Option<World> {
        self.state.lock().worlds.get(id).cloned()
    }
}

#[async_trait]
impl ProjectionStore for InMemoryProjectionStore {
    async fn find_pass_by_natural_key(
        &self,
        world_id: &str,
        name: &str,
    ) -> Result<Option<PassRecord>, StoreError> {
        let mut state = self.state.lock();
        state.calls += 1;
        Ok(state
            .passes
            .iter()
            .find(|p| p.world_id == world_id && p.name == name)
            .cloned())
    }

    async fn get_world(&self, world_id: &str) -> Result<Option<World>, StoreError> {
        let mut state = self.state.lock();
        state.calls += 1;
        Ok(state.worlds.get(world_id).cloned())
    }

    async fn upsert_world_pending(&self, draft: &WorldDraft) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state.calls += 1;
        let now = Utc::now();
        state
            .worlds
            .entry(draft.id.clone())
            .and_modify(|world| {
                world.name = draft.name.clone();
                world.world_type = draft.world_type;
                world.description = draft.description.clone();
                world.status = WorldStatus::Pending;
                world.updated_at = now;
            })
            .or_insert_with(|| World {
                id: draft.id.clone(),
                issuer_id: draft.issuer_id.clone(),
                name: draft.name.clone(),
                world_type: draft.world_type,
                description: draft.description.clone(),
                status: WorldStatus::Pending,
                topic_id: None,
                published_at: None,
                created_at: now,
                updated_at: now,
            });
        Ok(())
    }

    async fn record_world_live(
        &self,
        world_id: &str,
        topic_id: &TopicId,
        published_at: DateTime<Utc>,
        event: &LedgerEvent,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state.calls += 1;
        let world = state
            .worlds
            .get_mut(world_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: format!("world {world_id}"),
            })?;
        world.status = WorldStatus::Live;
        world.topic_id = Some(topic_id.clone());
        world.published_at = Some(published_at);
        world.updated_at = published_at;
        state.events.push(event.clone());
        Ok(())
    }

    async fn record_pass_minted(
        &self,
        pass: &PassRecord,
        event: &LedgerEvent,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state.calls += 1;
        // Both inserts or neither: constraints are checked before either
        // row lands.
        state.check_pass_constraints(pass)?;
        state.passes.push(pass.clone());
        state.events.push(event.clone());
        Ok(())
    }

    async fn record_pass_degraded(&self, pass: &PassRecord) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state.calls += 1;
        state.check_pass_constraints(pass)?;
        state.passes.push(pass.clone());
        Ok(())
    }

    async fn record_asset_inscribed(
        &self,
        asset: &AssetRecord,
        event: &LedgerEvent,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state.calls += 1;
        state.assets.push(asset.clone());
        state.events.push(event.clone());
        Ok(())
    }

    async fn record_asset_degraded(&self, asset: &AssetRecord) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state.calls += 1;
        state.assets.push(asset.clone());
        Ok(())
    }

    async fn insert_ledger_event(&self, event: &LedgerEvent) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state.calls += 1;
        state.events.push(event.clone());
        Ok(())
    }

    async fn latest_ledger_event(&self) -> Result<Option<LedgerEvent>, StoreError> {
        let mut state = self.state.lock();
        state.calls += 1;
        Ok(state.events.last().cloned())
    }
}
