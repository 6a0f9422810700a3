//! # Concurrent Duplicate Submissions
//!
//! The idempotency guard is check-then-act and can race: two requests for
//! the same natural key may both see "not found". The store's unique
//! constraint is the boundary that decides the winner, and the loser must
//! surface a conflict, never a silent duplicate.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use shared_types::{
        AccountId, AssetRecord, LedgerEvent, PassRecord, PassSupply, TopicId, World,
    };
    use wl_01_consensus_gateway::{ConsensusLogClient, InMemoryConsensusLog, TopicRegistry};
    use wl_02_projection::{
        InMemoryProjectionStore, ProjectionStore, StoreError, WorldDraft,
    };
    use wl_03_submission::{
        MintOutcome, PassDetails, PassMintIntent, RequestError, SubmissionConfig,
        SubmissionOrchestrator,
    };

    /// A store whose natural-key lookup always misses, simulating the
    /// guard race window where neither concurrent request sees the other.
    /// Every write still goes through the real constraints.
    struct GuardBlindStore {
        inner: InMemoryProjectionStore,
    }

    #[async_trait]
    impl ProjectionStore for GuardBlindStore {
        async fn find_pass_by_natural_key(
            &self,
            _world_id: &str,
            _name: &str,
        ) -> Result<Option<PassRecord>, StoreError> {
            Ok(None)
        }

        async fn get_world(&self, world_id: &str) -> Result<Option<World>, StoreError> {
            self.inner.get_world(world_id).await
        }

        async fn upsert_world_pending(&self, draft: &WorldDraft) -> Result<(), StoreError> {
            self.inner.upsert_world_pending(draft).await
        }

        async fn record_world_live(
            &self,
            world_id: &str,
            topic_id: &TopicId,
            published_at: DateTime<Utc>,
            event: &LedgerEvent,
        ) -> Result<(), StoreError> {
            self.inner
                .record_world_live(world_id, topic_id, published_at, event)
                .await
        }

        async fn record_pass_minted(
            &self,
            pass: &PassRecord,
            event: &LedgerEvent,
        ) -> Result<(), StoreError> {
            self.inner.record_pass_minted(pass, event).await
        }

        async fn record_pass_degraded(&self, pass: &PassRecord) -> Result<(), StoreError> {
            self.inner.record_pass_degraded(pass).await
        }

        async fn record_asset_inscribed(
            &self,
            asset: &AssetRecord,
            event: &LedgerEvent,
        ) -> Result<(), StoreError> {
            self.inner.record_asset_inscribed(asset, event).await
        }

        async fn record_asset_degraded(&self, asset: &AssetRecord) -> Result<(), StoreError> {
            self.inner.record_asset_degraded(asset).await
        }

        async fn insert_ledger_event(&self, event: &LedgerEvent) -> Result<(), StoreError> {
            self.inner.insert_ledger_event(event).await
        }

        async fn latest_ledger_event(&self) -> Result<Option<LedgerEvent>, StoreError> {
            self.inner.latest_ledger_event().await
        }
    }

    fn orchestrator_over(
        store: Arc<dyn ProjectionStore>,
    ) -> (SubmissionOrchestrator, Arc<InMemoryConsensusLog>) {
        let log = Arc::new(InMemoryConsensusLog::new());
        let topics = TopicRegistry {
            default: Some(TopicId::new("0.0.4000")),
            ..Default::default()
        };
        let orchestrator = SubmissionOrchestrator::new(
            SubmissionConfig::default(),
            log.clone() as Arc<dyn ConsensusLogClient>,
            topics,
            store,
        );
        (orchestrator, log)
    }

    fn issuer() -> AccountId {
        "0.0.1001".parse().unwrap()
    }

    fn mint_intent(name: &str) -> PassMintIntent {
        PassMintIntent {
            entity_id: "w1".to_string(),
            issuer_account_id: issuer(),
            pass: PassDetails {
                name: name.to_string(),
                description: None,
                image_url: None,
                supply: PassSupply::Finite { cap: 10 },
            },
        }
    }

    #[tokio::test]
    async fn test_race_loser_gets_conflict_not_silent_replay() {
        let inner = InMemoryProjectionStore::new();
        let store = Arc::new(GuardBlindStore { inner });
        let (orchestrator, _log) = orchestrator_over(store.clone());

        // Both "concurrent" requests miss the guard; the second loses at
        // the unique constraint.
        let first = orchestrator.mint_pass(mint_intent("VIP")).await.unwrap();
        assert!(matches!(first, MintOutcome::Minted { .. }));

        let err = orchestrator.mint_pass(mint_intent("VIP")).await.unwrap_err();
        match err {
            RequestError::Conflict { world_id, name } => {
                assert_eq!(world_id, "w1");
                assert_eq!(name, "VIP");
            }
            other => panic!("expected conflict, got {other:?}"),
        }

        // Exactly one of everything: the loser left no partial rows.
        assert_eq!(store.inner.passes().len(), 1);
        assert_eq!(store.inner.ledger_events().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_duplicates_yield_one_winner() {
        let inner = InMemoryProjectionStore::new();
        let store = Arc::new(GuardBlindStore { inner });
        let (orchestrator, _log) = orchestrator_over(store.clone());
        let orchestrator = Arc::new(orchestrator);

        let a = {
            let o = Arc::clone(&orchestrator);
            tokio::spawn(async move { o.mint_pass(mint_intent("VIP")).await })
        };
        let b = {
            let o = Arc::clone(&orchestrator);
            tokio::spawn(async move { o.mint_pass(mint_intent("VIP")).await })
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        let wins = results
            .iter()
            .filter(|r| matches!(r, Ok(MintOutcome::Minted { .. })))
            .count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(RequestError::Conflict { .. })))
            .count();

        assert_eq!(wins, 1, "exactly one creation must win");
        assert_eq!(conflicts, 1, "the loser must see a conflict");
        assert_eq!(store.inner.passes().len(), 1, "no duplicate rows ever exist");
        assert_eq!(store.inner.ledger_events().len(), 1);
    }
}
