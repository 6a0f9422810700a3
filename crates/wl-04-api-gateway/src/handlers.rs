//! Intent handlers and their request/response DTOs.
//!
//! The HTTP body shapes are camelCase, matching the client SDK; account
//! ids arrive as strings and are parsed here so every downstream layer
//! works with typed identifiers.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_types::{
    AccountId, DropKind, DropRequirements, MetaOp, PassStatus, PassSupply, Visibility,
    WorldProfile, WorldType,
};
use wl_03_submission::{
    AssetInscribeIntent, AssetMeta, AssetUrls, DropAnnounceIntent, DropDetails, InscribeOutcome,
    MintOutcome, PassDetails, PassMintIntent, PublishOutcome, SubmitReceipt, WorldMetaIntent,
};

use crate::domain::error::ApiError;
use crate::router::AppState;

fn parse_account(raw: &str) -> Result<AccountId, ApiError> {
    raw.parse::<AccountId>().map_err(ApiError::from)
}

// =============================================================================
// POST /intents/world-meta
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldMetaRequest {
    pub entity_id: String,
    pub issuer_account_id: String,
    pub profile: ProfileBody,
    #[serde(default)]
    pub operation: Option<MetaOp>,
    #[serde(default)]
    pub revision: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub world_type: WorldType,
    #[serde(default)]
    pub cover_art_url: Option<String>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
}

impl From<ProfileBody> for WorldProfile {
    fn from(body: ProfileBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            world_type: body.world_type,
            cover_art_url: body.cover_art_url,
            visibility: body.visibility.unwrap_or(Visibility::Public),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub success: bool,
    pub event_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consensus_timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl ReceiptResponse {
    fn published(receipt: SubmitReceipt) -> Self {
        Self {
            success: true,
            event_id: receipt.event_id,
            topic_id: Some(receipt.topic_id.to_string()),
            sequence_number: Some(receipt.receipt.sequence_number),
            consensus_timestamp: Some(receipt.receipt.consensus_timestamp),
            transaction_ref: Some(receipt.receipt.transaction_ref),
            content_hash: Some(receipt.content_hash.to_string()),
            warning: None,
        }
    }

    fn degraded(event_id: String, reason: String) -> Self {
        Self {
            success: true,
            event_id,
            topic_id: None,
            sequence_number: None,
            consensus_timestamp: None,
            transaction_ref: None,
            content_hash: None,
            warning: Some(format!("consensus submission failed: {reason}")),
        }
    }

    fn from_outcome(outcome: PublishOutcome) -> Self {
        match outcome {
            PublishOutcome::Published(receipt) => Self::published(receipt),
            PublishOutcome::Degraded { event_id, reason } => Self::degraded(event_id, reason),
        }
    }
}

pub async fn world_meta(
    State(state): State<AppState>,
    Json(body): Json<WorldMetaRequest>,
) -> Result<Json<ReceiptResponse>, ApiError> {
    let intent = WorldMetaIntent {
        entity_id: body.entity_id,
        issuer_account_id: parse_account(&body.issuer_account_id)?,
        profile: body.profile.into(),
        op: body.operation.unwrap_or(MetaOp::Create),
        revision: body.revision.unwrap_or(1),
    };
    let outcome = state.orchestrator.publish_world_meta(intent).await?;
    Ok(Json(ReceiptResponse::from_outcome(outcome)))
}

// =============================================================================
// POST /intents/pass-mint
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassMintRequest {
    pub entity_id: String,
    pub issuer_account_id: String,
    pub pass: PassBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub supply: PassSupply,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassMintResponse {
    pub success: bool,
    pub pass_id: Uuid,
    pub status: PassStatus,
    pub event_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

pub async fn pass_mint(
    State(state): State<AppState>,
    Json(body): Json<PassMintRequest>,
) -> Result<Json<PassMintResponse>, ApiError> {
    let intent = PassMintIntent {
        entity_id: body.entity_id,
        issuer_account_id: parse_account(&body.issuer_account_id)?,
        pass: PassDetails {
            name: body.pass.name,
            description: body.pass.description,
            image_url: body.pass.image_url,
            supply: body.pass.supply,
        },
    };

    let response = match state.orchestrator.mint_pass(intent).await? {
        MintOutcome::Minted { pass_id, receipt } => PassMintResponse {
            success: true,
            pass_id,
            status: PassStatus::Active,
            event_id: receipt.event_id,
            idempotent: None,
            sequence_number: Some(receipt.receipt.sequence_number),
            content_hash: Some(receipt.content_hash.to_string()),
            warning: None,
        },
        MintOutcome::Degraded {
            pass_id,
            event_id,
            reason,
        } => PassMintResponse {
            success: true,
            pass_id,
            status: PassStatus::Active,
            event_id,
            idempotent: None,
            sequence_number: None,
            content_hash: None,
            warning: Some(format!("consensus submission failed: {reason}")),
        },
        MintOutcome::Replayed {
            pass_id,
            status,
            event_id,
        } => PassMintResponse {
            success: true,
            pass_id,
            status,
            event_id,
            idempotent: Some(true),
            sequence_number: None,
            content_hash: None,
            warning: None,
        },
    };
    Ok(Json(response))
}

// =============================================================================
// POST /intents/asset-inscribe
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInscribeRequest {
    pub entity_id: String,
    pub issuer_account_id: String,
    pub urls: UrlsBody,
    pub meta: FileMetaBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlsBody {
    pub file_url: String,
    pub json_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetaBody {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InscribeResponse {
    pub success: bool,
    pub content_id: String,
    pub event_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

pub async fn asset_inscribe(
    State(state): State<AppState>,
    Json(body): Json<AssetInscribeRequest>,
) -> Result<Json<InscribeResponse>, ApiError> {
    let intent = AssetInscribeIntent {
        entity_id: body.entity_id,
        issuer_account_id: parse_account(&body.issuer_account_id)?,
        urls: AssetUrls {
            file_url: body.urls.file_url,
            json_url: body.urls.json_url,
        },
        meta: AssetMeta {
            file_name: body.meta.file_name,
            mime_type: body.meta.mime_type,
            size_bytes: body.meta.size_bytes,
        },
    };

    let response = match state.orchestrator.inscribe_asset(intent).await? {
        InscribeOutcome::Inscribed {
            content_id,
            receipt,
        } => InscribeResponse {
            success: true,
            content_id,
            event_id: receipt.event_id,
            topic_id: Some(receipt.topic_id.to_string()),
            sequence_number: Some(receipt.receipt.sequence_number),
            content_hash: Some(receipt.content_hash.to_string()),
            warning: None,
        },
        InscribeOutcome::Degraded {
            content_id,
            event_id,
            reason,
        } => InscribeResponse {
            success: true,
            content_id,
            event_id,
            topic_id: None,
            sequence_number: None,
            content_hash: None,
            warning: Some(format!("consensus submission failed: {reason}")),
        },
    };
    Ok(Json(response))
}

// =============================================================================
// POST /intents/drop-announce
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropAnnounceRequest {
    pub entity_id: String,
    pub issuer_account_id: String,
    pub drop: DropBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropBody {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub drop_kind: DropKind,
    #[serde(default)]
    pub requirements: Option<DropRequirements>,
}

pub async fn drop_announce(
    State(state): State<AppState>,
    Json(body): Json<DropAnnounceRequest>,
) -> Result<Json<ReceiptResponse>, ApiError> {
    let intent = DropAnnounceIntent {
        entity_id: body.entity_id,
        issuer_account_id: parse_account(&body.issuer_account_id)?,
        drop: DropDetails {
            id: body.drop.id,
            name: body.drop.name,
            drop_kind: body.drop.drop_kind,
            requirements: body.drop.requirements,
        },
    };
    let outcome = state.orchestrator.announce_drop(intent).await?;
    Ok(Json(ReceiptResponse::from_outcome(outcome)))
}

// =============================================================================
// GET /ledger/latest, GET /health
// =============================================================================

pub async fn ledger_latest(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    match state.orchestrator.latest_ledger_event().await? {
        Some(event) => Ok(Json(serde_json::to_value(&event).unwrap_or(Value::Null))),
        None => Ok(Json(json!({ "message": "No events found" }))),
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
