//! Intent inputs.
//!
//! The orchestrator-facing shapes of each request, already past the
//! transport layer: account ids are parsed, numbers are numbers. Payload
//! validation (required sub-fields, length budgets) still happens in
//! envelope construction.

use shared_types::{AccountId, DropKind, DropRequirements, MetaOp, PassSupply, WorldProfile};

/// Create or update a world's public profile.
#[derive(Debug, Clone)]
pub struct WorldMetaIntent {
    pub entity_id: String,
    pub issuer_account_id: AccountId,
    pub profile: WorldProfile,
    pub op: MetaOp,
    /// Ordering intent independent of consensus ordering.
    pub revision: u64,
}

/// Mint a membership pass definition.
#[derive(Debug, Clone)]
pub struct PassMintIntent {
    pub entity_id: String,
    pub issuer_account_id: AccountId,
    pub pass: PassDetails,
}

/// Caller-supplied pass fields; the id and status are server-assigned.
#[derive(Debug, Clone)]
pub struct PassDetails {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub supply: PassSupply,
}

/// Inscribe pre-staged media.
#[derive(Debug, Clone)]
pub struct AssetInscribeIntent {
    pub entity_id: String,
    pub issuer_account_id: AccountId,
    pub urls: AssetUrls,
    pub meta: AssetMeta,
}

/// Staged object-store locations.
#[derive(Debug, Clone)]
pub struct AssetUrls {
    pub file_url: String,
    pub json_url: String,
}

/// File descriptor for an inscription.
#[derive(Debug, Clone)]
pub struct AssetMeta {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

/// Announce a drop to a world's members.
#[derive(Debug, Clone)]
pub struct DropAnnounceIntent {
    pub entity_id: String,
    pub issuer_account_id: AccountId,
    pub drop: DropDetails,
}

/// The announced drop.
#[derive(Debug, Clone)]
pub struct DropDetails {
    pub id: String,
    pub name: String,
    pub drop_kind: DropKind,
    pub requirements: Option<DropRequirements>,
}
