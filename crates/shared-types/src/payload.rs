//! # Envelope Payloads
//!
//! The closed sum type over the four envelope kinds. Each variant carries
//! its own strongly-typed record, so an envelope can never pair a `PASS`
//! kind with meta fields: the kind IS the variant.
//!
//! On the wire each payload is internally tagged with its canon version tag
//! (`world.meta@1`, `world.content@1`, `world.signal@1`, `world.pass@1`),
//! matching the payloads already published on the log.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::envelope::{EnvelopeKind, Operation};
use crate::errors::ValidationError;

/// Maximum length accepted for free-text note/description fields.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// The payload of one state-changing intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum EnvelopePayload {
    /// World profile create/update.
    #[serde(rename = "world.meta@1")]
    Meta(MetaPayload),
    /// Media inscription (pre-staged file + descriptor JSON).
    #[serde(rename = "world.content@1")]
    Content(ContentPayload),
    /// Broadcast signal (drop announcement, recognition).
    #[serde(rename = "world.signal@1")]
    Signal(SignalPayload),
    /// Membership pass mint.
    #[serde(rename = "world.pass@1")]
    Pass(PassPayload),
}

impl EnvelopePayload {
    /// The envelope kind this payload belongs to.
    pub fn kind(&self) -> EnvelopeKind {
        match self {
            Self::Meta(_) => EnvelopeKind::Meta,
            Self::Content(_) => EnvelopeKind::Content,
            Self::Signal(_) => EnvelopeKind::Signal,
            Self::Pass(_) => EnvelopeKind::Pass,
        }
    }

    /// The operation verb recorded in the event id.
    pub fn operation(&self) -> Operation {
        match self {
            Self::Meta(meta) => match meta.op {
                MetaOp::Create => Operation::Create,
                MetaOp::Update => Operation::Update,
            },
            Self::Content(_) => Operation::Inscribe,
            Self::Signal(_) => Operation::Announce,
            Self::Pass(_) => Operation::Mint,
        }
    }

    /// Check the per-kind required sub-fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Meta(meta) => meta.validate(),
            Self::Content(content) => content.validate(),
            Self::Signal(signal) => signal.validate(),
            Self::Pass(pass) => pass.validate(),
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(())
}

fn bounded(field: &'static str, value: &Option<String>) -> Result<(), ValidationError> {
    if let Some(text) = value {
        if text.len() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::FieldTooLong {
                field,
                max: MAX_DESCRIPTION_LEN,
            });
        }
    }
    Ok(())
}

// =============================================================================
// WORLD_META
// =============================================================================

/// `world.meta@1` - create or update a world's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaPayload {
    pub op: MetaOp,
    pub profile: WorldProfile,
}

impl MetaPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        require("profile.name", &self.profile.name)?;
        bounded("profile.description", &self.profile.description)
    }
}

/// The meta operation: first publish or profile revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetaOp {
    #[serde(rename = "CREATE")]
    Create,
    #[serde(rename = "UPDATE")]
    Update,
}

/// Public profile of a world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldProfile {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub world_type: WorldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_art_url: Option<String>,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorldType {
    Artist,
    Label,
    Brand,
    Community,
    Other,
}

impl WorldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Artist => "ARTIST",
            Self::Label => "LABEL",
            Self::Brand => "BRAND",
            Self::Community => "COMMUNITY",
            Self::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    Public,
    Private,
}

// =============================================================================
// WORLD_CONTENT
// =============================================================================

/// `world.content@1` - inscribe pre-staged media.
///
/// The file itself is staged to the object store before the intent is
/// submitted; this payload carries the staged URLs plus the descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPayload {
    pub content_id: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub file_url: String,
    pub json_url: String,
}

impl ContentPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        require("content_id", &self.content_id)?;
        require("file_name", &self.file_name)?;
        require("mime_type", &self.mime_type)?;
        require("file_url", &self.file_url)?;
        require("json_url", &self.json_url)
    }

    /// Coarse asset class derived from the mime type ("image", "audio", ...).
    pub fn asset_type(&self) -> &str {
        self.mime_type.split('/').next().unwrap_or("unknown")
    }
}

// =============================================================================
// WORLD_SIGNAL
// =============================================================================

/// `world.signal@1` - broadcast signal scoped to a world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalPayload {
    pub signal_type: SignalType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    pub data: SignalData,
}

impl SignalPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        // Drop announcements address a concrete drop; recognition signals
        // may be world-wide.
        if self.signal_type == SignalType::DropAnnounce && self.target_id.is_none() {
            return Err(ValidationError::MissingField { field: "target_id" });
        }
        require("data.name", &self.data.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalType {
    DropAnnounce,
    Recognition,
}

/// Structured signal body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalData {
    pub name: String,
    #[serde(rename = "type")]
    pub drop_kind: DropKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<DropRequirements>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DropKind {
    Audio,
    Video,
    AccessPass,
    DigitalArt,
}

/// What a member must do to claim a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropRequirements {
    pub action: RequirementAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequirementAction {
    Invite,
    Follow,
    Attend,
    None,
}

// =============================================================================
// WORLD_PASS
// =============================================================================

/// `world.pass@1` - mint a membership pass definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassPayload {
    pub pass_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub supply: PassSupply,
    pub status: PassStatus,
}

impl PassPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        require("pass.name", &self.name)?;
        bounded("pass.description", &self.description)?;
        if let PassSupply::Finite { cap } = self.supply {
            if cap == 0 {
                return Err(ValidationError::InvalidSupply);
            }
        }
        Ok(())
    }
}

/// Supply policy for a pass. Finite passes carry a hard cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassSupply {
    Finite { cap: u32 },
    Infinite,
}

impl PassSupply {
    pub fn type_str(&self) -> &'static str {
        match self {
            Self::Finite { .. } => "FINITE",
            Self::Infinite => "INFINITE",
        }
    }

    pub fn cap(&self) -> Option<u32> {
        match self {
            Self::Finite { cap } => Some(*cap),
            Self::Infinite => None,
        }
    }
}

/// Lifecycle of a pass definition. Minted passes auto-activate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassStatus {
    Draft,
    Active,
    Revoked,
}

impl PassStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Active => "ACTIVE",
            Self::Revoked => "REVOKED",
        }
    }
}
