//! Submission Orchestrator.
//!
//! One method per intent type, each walking the request state machine:
//! guard, validate, (idempotency), hash, submit once, project, respond.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_crypto::seal;
use shared_types::{
    AssetRecord, ContentHash, ContentPayload, Envelope, EnvelopePayload, LedgerEvent, MetaPayload,
    PassPayload, PassRecord, PassStatus, SignalData, SignalPayload, SignalType, SubmissionStatus,
};
use wl_01_consensus_gateway::{ConsensusLogClient, ConsensusSubmitter, TopicRegistry};
use wl_02_projection::{ProjectionStore, WorldDraft};

use crate::config::SubmissionConfig;
use crate::guard::{GuardDecision, IdempotencyGuard};
use crate::intents::{
    AssetInscribeIntent, DropAnnounceIntent, PassMintIntent, WorldMetaIntent,
};
use crate::outcome::{
    InscribeOutcome, MintOutcome, PublishOutcome, RequestError, RequestPhase, SubmitReceipt,
};

/// The top-level coordinator, one instance per process.
///
/// Owns no request state: every method is an independent walk through the
/// pipeline over the shared pooled resources.
pub struct SubmissionOrchestrator {
    config: SubmissionConfig,
    submitter: ConsensusSubmitter,
    guard: IdempotencyGuard,
    store: Arc<dyn ProjectionStore>,
}

impl SubmissionOrchestrator {
    pub fn new(
        config: SubmissionConfig,
        client: Arc<dyn ConsensusLogClient>,
        topics: TopicRegistry,
        store: Arc<dyn ProjectionStore>,
    ) -> Self {
        let submitter =
            ConsensusSubmitter::new(client, topics).with_timeout(config.submit_timeout);
        Self {
            config,
            submitter,
            guard: IdempotencyGuard::new(Arc::clone(&store)),
            store,
        }
    }

    /// Publish or update a world's profile.
    ///
    /// The world row is staged at PENDING before submission, so a degraded
    /// outcome leaves a visible created-but-unsynced record.
    pub async fn publish_world_meta(
        &self,
        intent: WorldMetaIntent,
    ) -> Result<PublishOutcome, RequestError> {
        self.config.ensure_submissions_enabled()?;

        // 1. Build + validate the envelope.
        let payload = EnvelopePayload::Meta(MetaPayload {
            op: intent.op,
            profile: intent.profile.clone(),
        });
        let mut envelope = Envelope::build(
            intent.entity_id,
            intent.issuer_account_id.clone(),
            payload,
            intent.revision,
            Utc::now().timestamp_millis(),
        )?;
        debug!(phase = %RequestPhase::Validated, event_id = %envelope.event_id, "World meta intent validated");

        // 2. Resolve the channel; fail closed before any side effect.
        let topic_id = self.submitter.topic_for(envelope.kind())?;

        // 3. Stage the PENDING row.
        let draft = WorldDraft {
            id: envelope.entity_id.clone(),
            issuer_id: intent.issuer_account_id,
            name: intent.profile.name.clone(),
            world_type: intent.profile.world_type,
            description: intent.profile.description.clone(),
        };
        self.store
            .upsert_world_pending(&draft)
            .await
            .map_err(RequestError::Store)?;

        // 4. Hash + submit once.
        let sealed = self.seal_and_serialize(&mut envelope)?;
        match self.submitter.submit_once(&topic_id, &sealed.message).await {
            Ok(receipt) => {
                debug!(phase = %RequestPhase::Projecting, event_id = %envelope.event_id, "Marking world LIVE");
                let now = Utc::now();
                let event = LedgerEvent::from_receipt(
                    &envelope.entity_id,
                    topic_id.clone(),
                    envelope.kind(),
                    &receipt,
                    sealed.content_hash,
                    now,
                );
                self.store
                    .record_world_live(&envelope.entity_id, &topic_id, now, &event)
                    .await
                    .map_err(RequestError::Store)?;

                info!(
                    entity_id = %envelope.entity_id,
                    topic_id = %topic_id,
                    sequence_number = receipt.sequence_number,
                    "World published"
                );
                Ok(PublishOutcome::Published(SubmitReceipt {
                    topic_id,
                    receipt,
                    content_hash: sealed.content_hash,
                    event_id: envelope.event_id,
                }))
            }
            Err(e) => {
                warn!(
                    phase = %RequestPhase::ProjectingDegraded,
                    event_id = %envelope.event_id,
                    error = %e,
                    "Consensus submission failed; world stays PENDING"
                );
                Ok(PublishOutcome::Degraded {
                    event_id: envelope.event_id,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Mint a membership pass.
    ///
    /// The only path with a natural key, and therefore the only one with an
    /// idempotency pre-check. A duplicate intent short-circuits to the
    /// original identifiers; a race lost at the store's unique constraint
    /// surfaces as a conflict.
    pub async fn mint_pass(&self, intent: PassMintIntent) -> Result<MintOutcome, RequestError> {
        self.config.ensure_submissions_enabled()?;

        // 1. Build + validate. Ids and status are server-assigned.
        let pass_id = Uuid::now_v7();
        let payload = EnvelopePayload::Pass(PassPayload {
            pass_id,
            name: intent.pass.name.clone(),
            description: intent.pass.description.clone(),
            image_url: intent.pass.image_url.clone(),
            supply: intent.pass.supply,
            status: PassStatus::Active,
        });
        let mut envelope = Envelope::build(
            intent.entity_id,
            intent.issuer_account_id.clone(),
            payload,
            1,
            Utc::now().timestamp_millis(),
        )?;

        // 2. Idempotency pre-check on the natural key.
        if let GuardDecision::Found(existing) = self
            .guard
            .check_pass(&envelope.entity_id, &intent.pass.name)
            .await
            .map_err(RequestError::Store)?
        {
            debug!(phase = %RequestPhase::IdempotentHit, pass_id = %existing.id, "Duplicate mint intent");
            return Ok(MintOutcome::Replayed {
                pass_id: existing.id,
                status: existing.status,
                event_id: existing.event_id,
            });
        }

        // 3. Resolve the channel.
        let topic_id = self.submitter.topic_for(envelope.kind())?;

        // 4. Hash + submit once.
        let sealed = self.seal_and_serialize(&mut envelope)?;
        let now = Utc::now();
        let mut record = PassRecord {
            id: pass_id,
            world_id: envelope.entity_id.clone(),
            issuer_id: intent.issuer_account_id,
            name: intent.pass.name.clone(),
            description: intent.pass.description,
            image_url: intent.pass.image_url,
            supply: intent.pass.supply,
            status: PassStatus::Active,
            event_id: envelope.event_id.clone(),
            submission_status: SubmissionStatus::Pending,
            topic_id: None,
            sequence_number: None,
            created_at: now,
            updated_at: now,
        };

        match self.submitter.submit_once(&topic_id, &sealed.message).await {
            Ok(receipt) => {
                record.submission_status = SubmissionStatus::Confirmed;
                record.topic_id = Some(topic_id.clone());
                record.sequence_number = Some(receipt.sequence_number);

                let event = LedgerEvent::from_receipt(
                    &record.world_id,
                    topic_id.clone(),
                    envelope.kind(),
                    &receipt,
                    sealed.content_hash,
                    now,
                );
                self.store
                    .record_pass_minted(&record, &event)
                    .await
                    .map_err(|e| RequestError::from_store(e, &record.world_id, &record.name))?;

                info!(
                    pass_id = %pass_id,
                    world_id = %record.world_id,
                    sequence_number = receipt.sequence_number,
                    "Pass minted"
                );
                Ok(MintOutcome::Minted {
                    pass_id,
                    receipt: SubmitReceipt {
                        topic_id,
                        receipt,
                        content_hash: sealed.content_hash,
                        event_id: envelope.event_id,
                    },
                })
            }
            Err(e) => {
                // Continue to persist so the caller is not blocked, marked
                // FAILED so sync is visibly pending.
                warn!(
                    phase = %RequestPhase::ProjectingDegraded,
                    event_id = %envelope.event_id,
                    error = %e,
                    "Consensus submission failed; persisting pass as FAILED"
                );
                record.submission_status = SubmissionStatus::Failed;
                self.store
                    .record_pass_degraded(&record)
                    .await
                    .map_err(|err| RequestError::from_store(err, &record.world_id, &record.name))?;

                Ok(MintOutcome::Degraded {
                    pass_id,
                    event_id: envelope.event_id,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Inscribe pre-staged media.
    pub async fn inscribe_asset(
        &self,
        intent: AssetInscribeIntent,
    ) -> Result<InscribeOutcome, RequestError> {
        self.config.ensure_submissions_enabled()?;

        // Every inscription is a distinct intent: the content id is
        // server-generated per request, so there is no natural key to guard.
        let content_id = Uuid::now_v7().to_string();
        let payload = EnvelopePayload::Content(ContentPayload {
            content_id: content_id.clone(),
            file_name: intent.meta.file_name.clone(),
            mime_type: intent.meta.mime_type.clone(),
            size_bytes: intent.meta.size_bytes,
            file_url: intent.urls.file_url.clone(),
            json_url: intent.urls.json_url.clone(),
        });
        let mut envelope = Envelope::build(
            intent.entity_id,
            intent.issuer_account_id.clone(),
            payload,
            1,
            Utc::now().timestamp_millis(),
        )?;

        let topic_id = self.submitter.topic_for(envelope.kind())?;
        let sealed = self.seal_and_serialize(&mut envelope)?;

        let now = Utc::now();
        let asset = AssetRecord {
            id: content_id.clone(),
            world_id: envelope.entity_id.clone(),
            issuer_id: intent.issuer_account_id,
            asset_type: match &envelope.payload {
                EnvelopePayload::Content(c) => c.asset_type().to_string(),
                _ => unreachable!("payload built as Content above"),
            },
            file_name: intent.meta.file_name,
            mime_type: intent.meta.mime_type,
            size_bytes: intent.meta.size_bytes,
            content_hash: sealed.content_hash,
            created_at: now,
        };

        match self.submitter.submit_once(&topic_id, &sealed.message).await {
            Ok(receipt) => {
                let event = LedgerEvent::from_receipt(
                    &asset.world_id,
                    topic_id.clone(),
                    envelope.kind(),
                    &receipt,
                    sealed.content_hash,
                    now,
                );
                self.store
                    .record_asset_inscribed(&asset, &event)
                    .await
                    .map_err(RequestError::Store)?;

                info!(content_id = %content_id, world_id = %asset.world_id, "Asset inscribed");
                Ok(InscribeOutcome::Inscribed {
                    content_id,
                    receipt: SubmitReceipt {
                        topic_id,
                        receipt,
                        content_hash: sealed.content_hash,
                        event_id: envelope.event_id,
                    },
                })
            }
            Err(e) => {
                warn!(
                    phase = %RequestPhase::ProjectingDegraded,
                    event_id = %envelope.event_id,
                    error = %e,
                    "Consensus submission failed; persisting asset unsynced"
                );
                self.store
                    .record_asset_degraded(&asset)
                    .await
                    .map_err(RequestError::Store)?;
                Ok(InscribeOutcome::Degraded {
                    content_id,
                    event_id: envelope.event_id,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Announce a drop to a world's members.
    ///
    /// Signals project no entity row; a confirmed announce appends its
    /// ledger event, a degraded one persists nothing locally.
    pub async fn announce_drop(
        &self,
        intent: DropAnnounceIntent,
    ) -> Result<PublishOutcome, RequestError> {
        self.config.ensure_submissions_enabled()?;

        let payload = EnvelopePayload::Signal(SignalPayload {
            signal_type: SignalType::DropAnnounce,
            target_id: Some(intent.drop.id.clone()),
            data: SignalData {
                name: intent.drop.name.clone(),
                drop_kind: intent.drop.drop_kind,
                requirements: intent.drop.requirements,
            },
        });
        let mut envelope = Envelope::build(
            intent.entity_id,
            intent.issuer_account_id,
            payload,
            1,
            Utc::now().timestamp_millis(),
        )?;

        let topic_id = self.submitter.topic_for(envelope.kind())?;
        let sealed = self.seal_and_serialize(&mut envelope)?;

        match self.submitter.submit_once(&topic_id, &sealed.message).await {
            Ok(receipt) => {
                let event = LedgerEvent::from_receipt(
                    &envelope.entity_id,
                    topic_id.clone(),
                    envelope.kind(),
                    &receipt,
                    sealed.content_hash,
                    Utc::now(),
                );
                self.store
                    .insert_ledger_event(&event)
                    .await
                    .map_err(RequestError::Store)?;

                info!(entity_id = %envelope.entity_id, drop_id = %intent.drop.id, "Drop announced");
                Ok(PublishOutcome::Published(SubmitReceipt {
                    topic_id,
                    receipt,
                    content_hash: sealed.content_hash,
                    event_id: envelope.event_id,
                }))
            }
            Err(e) => {
                warn!(
                    event_id = %envelope.event_id,
                    error = %e,
                    "Consensus submission failed; drop announce not recorded"
                );
                Ok(PublishOutcome::Degraded {
                    event_id: envelope.event_id,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Most recent receipt row, for the debug read surface.
    pub async fn latest_ledger_event(
        &self,
    ) -> Result<Option<LedgerEvent>, RequestError> {
        self.store
            .latest_ledger_event()
            .await
            .map_err(RequestError::Store)
    }

    fn seal_and_serialize(&self, envelope: &mut Envelope) -> Result<SealedMessage, RequestError> {
        let content_hash = seal(envelope)?;
        let message = envelope
            .to_message_bytes()
            .map_err(|e| RequestError::Canonicalize(e.into()))?;
        debug!(
            phase = %RequestPhase::Hashed,
            event_id = %envelope.event_id,
            content_hash = %content_hash,
            "Envelope sealed"
        );
        Ok(SealedMessage {
            content_hash,
            message,
        })
    }
}

struct SealedMessage {
    content_hash: ContentHash,
    message: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intents::{AssetMeta, AssetUrls, DropDetails, PassDetails};
    use crate::Network;
    use shared_types::{
        AccountId, DropKind, MetaOp, PassSupply, TopicId, Visibility, WorldProfile, WorldStatus,
        WorldType,
    };
    use wl_01_consensus_gateway::{ConsensusError, InMemoryConsensusLog};
    use wl_02_projection::InMemoryProjectionStore;

    struct Harness {
        log: Arc<InMemoryConsensusLog>,
        store: Arc<InMemoryProjectionStore>,
        orchestrator: SubmissionOrchestrator,
    }

    fn harness_with(config: SubmissionConfig) -> Harness {
        let log = Arc::new(InMemoryConsensusLog::new());
        let store = Arc::new(InMemoryProjectionStore::new());
        let topics = TopicRegistry {
            meta: Some(TopicId::new("0.0.4001")),
            pass: Some(TopicId::new("0.0.4002")),
            default: Some(TopicId::new("0.0.4000")),
            ..Default::default()
        };
        let orchestrator = SubmissionOrchestrator::new(
            config,
            log.clone() as Arc<dyn ConsensusLogClient>,
            topics,
            store.clone() as Arc<dyn ProjectionStore>,
        );
        Harness {
            log,
            store,
            orchestrator,
        }
    }

    fn harness() -> Harness {
        harness_with(SubmissionConfig::default())
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
                supply: PassSupply::Finite { cap: 100 },
            },
        }
    }

    fn meta_intent() -> WorldMetaIntent {
        WorldMetaIntent {
            entity_id: "w1".to_string(),
            issuer_account_id: issuer(),
            profile: WorldProfile {
                name: "Neon District".to_string(),
                description: None,
                world_type: WorldType::Community,
                cover_art_url: None,
                visibility: Visibility::Public,
            },
            op: MetaOp::Create,
            revision: 1,
        }
    }

    #[tokio::test]
    async fn test_world_meta_publish_goes_live() {
        let h = harness();
        let outcome = h.orchestrator.publish_world_meta(meta_intent()).await.unwrap();

        let receipt = match outcome {
            PublishOutcome::Published(r) => r,
            PublishOutcome::Degraded { reason, .. } => panic!("degraded: {reason}"),
        };
        assert_eq!(receipt.topic_id, TopicId::new("0.0.4001"));
        assert_eq!(receipt.receipt.sequence_number, 1);

        let world = h.store.world("w1").unwrap();
        assert_eq!(world.status, WorldStatus::Live);
        assert_eq!(world.topic_id, Some(TopicId::new("0.0.4001")));
        assert_eq!(h.store.ledger_events().len(), 1);
    }

    #[tokio::test]
    async fn test_world_meta_degraded_stays_pending() {
        let h = harness();
        h.log.fail_with(ConsensusError::Unavailable {
            message: "log down".to_string(),
        });

        let outcome = h.orchestrator.publish_world_meta(meta_intent()).await.unwrap();
        assert!(matches!(outcome, PublishOutcome::Degraded { .. }));

        let world = h.store.world("w1").unwrap();
        assert_eq!(world.status, WorldStatus::Pending);
        assert!(h.store.ledger_events().is_empty());
    }

    #[tokio::test]
    async fn test_mint_then_replay_returns_same_pass() {
        let h = harness();

        let first = h.orchestrator.mint_pass(mint_intent("VIP")).await.unwrap();
        let minted_id = match first {
            MintOutcome::Minted { pass_id, .. } => pass_id,
            other => panic!("expected fresh mint, got {other:?}"),
        };

        let second = h.orchestrator.mint_pass(mint_intent("VIP")).await.unwrap();
        match second {
            MintOutcome::Replayed {
                pass_id, status, ..
            } => {
                assert_eq!(pass_id, minted_id);
                assert_eq!(status, PassStatus::Active);
            }
            other => panic!("expected replay, got {other:?}"),
        }

        // Exactly one pass row and one ledger event after the replay.
        assert_eq!(h.store.passes().len(), 1);
        assert_eq!(h.store.ledger_events().len(), 1);
        assert_eq!(h.log.call_count(), 1);
    }

    #[tokio::test]
    async fn test_degraded_mint_persists_failed_row_without_event() {
        let h = harness();
        h.log.fail_with(ConsensusError::Timeout { timeout_ms: 10 });

        let outcome = h.orchestrator.mint_pass(mint_intent("VIP")).await.unwrap();
        assert!(matches!(outcome, MintOutcome::Degraded { .. }));

        let passes = h.store.passes();
        assert_eq!(passes.len(), 1);
        assert_eq!(passes[0].submission_status, SubmissionStatus::Failed);
        assert!(passes[0].sequence_number.is_none());
        assert!(h.store.ledger_events().is_empty());
    }

    #[tokio::test]
    async fn test_degraded_mint_still_dedupes_on_replay() {
        let h = harness();
        h.log.fail_with(ConsensusError::Timeout { timeout_ms: 10 });
        h.orchestrator.mint_pass(mint_intent("VIP")).await.unwrap();

        h.log.clear_failure();
        let outcome = h.orchestrator.mint_pass(mint_intent("VIP")).await.unwrap();
        // The FAILED row still owns the natural key; the retry replays it
        // rather than double-minting.
        assert!(matches!(outcome, MintOutcome::Replayed { .. }));
        assert_eq!(h.store.passes().len(), 1);
    }

    #[tokio::test]
    async fn test_mainnet_guard_blocks_before_any_call() {
        let h = harness_with(SubmissionConfig {
            network: Network::Mainnet,
            ..Default::default()
        });

        let err = h.orchestrator.mint_pass(mint_intent("VIP")).await.unwrap_err();
        assert!(matches!(err, RequestError::Configuration(_)));

        // Fail-closed means zero consensus calls and zero store calls.
        assert_eq!(h.log.call_count(), 0);
        assert_eq!(h.store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_pass_is_rejected_without_side_effects() {
        let h = harness();
        let mut intent = mint_intent("VIP");
        intent.pass.supply = PassSupply::Finite { cap: 0 };

        let err = h.orchestrator.mint_pass(intent).await.unwrap_err();
        assert!(matches!(err, RequestError::Validation(_)));
        // Validation failures never reach the consensus or projection layers.
        assert_eq!(h.log.call_count(), 0);
        assert_eq!(h.store.call_count(), 0);
        assert!(h.store.passes().is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_topic_is_config_error() {
        let log = Arc::new(InMemoryConsensusLog::new());
        let store = Arc::new(InMemoryProjectionStore::new());
        let topics = TopicRegistry {
            meta: Some(TopicId::new("0.0.4001")),
            ..Default::default()
        };
        let orchestrator = SubmissionOrchestrator::new(
            SubmissionConfig::default(),
            log.clone() as Arc<dyn ConsensusLogClient>,
            topics,
            store as Arc<dyn ProjectionStore>,
        );

        let err = orchestrator.mint_pass(mint_intent("VIP")).await.unwrap_err();
        assert!(matches!(err, RequestError::Configuration(_)));
        assert_eq!(log.call_count(), 0);
    }

    #[tokio::test]
    async fn test_inscribe_records_asset_and_event() {
        let h = harness();
        let outcome = h
            .orchestrator
            .inscribe_asset(AssetInscribeIntent {
                entity_id: "w1".to_string(),
                issuer_account_id: issuer(),
                urls: AssetUrls {
                    file_url: "https://cdn.example/file.png".to_string(),
                    json_url: "https://cdn.example/file.json".to_string(),
                },
                meta: AssetMeta {
                    file_name: "file.png".to_string(),
                    mime_type: "image/png".to_string(),
                    size_bytes: 2048,
                },
            })
            .await
            .unwrap();

        assert!(matches!(outcome, InscribeOutcome::Inscribed { .. }));
        let assets = h.store.assets();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].asset_type, "image");
        assert_eq!(h.store.ledger_events().len(), 1);
    }

    #[tokio::test]
    async fn test_degraded_announce_records_nothing() {
        let h = harness();
        h.log.fail_with(ConsensusError::Rejected {
            message: "oversized".to_string(),
        });

        let outcome = h
            .orchestrator
            .announce_drop(DropAnnounceIntent {
                entity_id: "w1".to_string(),
                issuer_account_id: issuer(),
                drop: DropDetails {
                    id: "drop-1".to_string(),
                    name: "Summer drop".to_string(),
                    drop_kind: DropKind::Audio,
                    requirements: None,
                },
            })
            .await
            .unwrap();

        assert!(matches!(outcome, PublishOutcome::Degraded { .. }));
        assert!(h.store.ledger_events().is_empty());
    }

    #[tokio::test]
    async fn test_submitted_message_is_sealed_wire_envelope() {
        let h = harness();
        h.orchestrator.mint_pass(mint_intent("VIP")).await.unwrap();

        let accepted = h.log.accepted();
        assert_eq!(accepted.len(), 1);
        let value: serde_json::Value = serde_json::from_slice(&accepted[0].message).unwrap();
        assert_eq!(value["type"], "WORLD_PASS");
        assert_eq!(value["payload"]["t"], "world.pass@1");
        assert!(value["content_hash"]
            .as_str()
            .unwrap()
            .starts_with("sha256:"));
    }
}
