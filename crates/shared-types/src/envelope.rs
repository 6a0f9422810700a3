//! # Intent Envelope
//!
//! The canonical, versioned wrapper for every state-changing intent that
//! reaches the consensus log.
//!
//! ## Properties
//!
//! - **Versioning**: every envelope carries a `version` field for forward
//!   compatibility; deserializers MUST check it before processing.
//! - **Scoping**: `app_id` pins the envelope to this application, so a
//!   shared consensus log can never hand us another tenant's messages.
//! - **Correlation**: `event_id` ties the envelope to its projection rows
//!   and log lines for audit tracing.
//! - **Kind authority**: the envelope kind is derived from the payload
//!   variant - a kind/payload mismatch is unrepresentable.
//! - **Server-side hashing**: `content_hash` is only ever attached by the
//!   canonicalizer; client-supplied hashes are discarded.

use std::fmt;

use serde::Serialize;

use crate::ids::{AccountId, ContentHash};
use crate::payload::EnvelopePayload;
use crate::ValidationError;

/// Application scope constant for all envelopes submitted by this system.
///
/// Prevents cross-tenant collisions on a shared consensus log.
pub const APP_ID: &str = "worldledger";

/// The kind of a state-changing intent, one per payload variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EnvelopeKind {
    #[serde(rename = "WORLD_META")]
    Meta,
    #[serde(rename = "WORLD_CONTENT")]
    Content,
    #[serde(rename = "WORLD_SIGNAL")]
    Signal,
    #[serde(rename = "WORLD_PASS")]
    Pass,
}

impl EnvelopeKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Meta => "WORLD_META",
            Self::Content => "WORLD_CONTENT",
            Self::Signal => "WORLD_SIGNAL",
            Self::Pass => "WORLD_PASS",
        }
    }
}

impl fmt::Display for EnvelopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The operation verb half of an event id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    Create,
    Update,
    Mint,
    Inscribe,
    Announce,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Mint => "MINT",
            Self::Inscribe => "INSCRIBE",
            Self::Announce => "ANNOUNCE",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The canonical record of one state-changing intent.
///
/// Built by [`Envelope::build`] and nowhere else: construction validates
/// the entity id and the payload's required sub-fields, derives the event
/// id, and leaves `content_hash` unset for the canonicalizer to fill.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Application scope (always [`APP_ID`] for envelopes we build).
    pub app_id: String,
    /// Schema version, currently [`Envelope::CURRENT_VERSION`].
    pub version: u16,
    /// Deterministic correlation id:
    /// `{entity_id}:{kind}:{operation}:{client_timestamp}`.
    ///
    /// Used for audit correlation only. It collides across distinct intents
    /// in the same millisecond and diverges across retries, so idempotency
    /// keys on the natural key instead (entity + name).
    pub event_id: String,
    /// World / subject identifier. Never empty.
    pub entity_id: String,
    /// External-identity reference of the acting issuer.
    pub issuer_account_id: AccountId,
    /// Milliseconds since epoch, assigned by the submitter.
    pub client_timestamp: i64,
    /// Monotonically increasing revision per entity; expresses ordering
    /// intent independent of consensus ordering.
    pub revision: u64,
    /// The typed payload; also determines the envelope kind.
    pub payload: EnvelopePayload,
    /// `sha256:<hex>` over the canonical fields. `None` until sealed.
    pub content_hash: Option<ContentHash>,
}

impl Envelope {
    /// Current envelope schema version.
    pub const CURRENT_VERSION: u16 = 1;

    /// Construct a validated envelope. Pure: the caller supplies the clock.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::EmptyEntityId`] when `entity_id` is blank.
    /// - Payload-specific errors from [`EnvelopePayload::validate`].
    pub fn build(
        entity_id: impl Into<String>,
        issuer_account_id: AccountId,
        payload: EnvelopePayload,
        revision: u64,
        client_timestamp: i64,
    ) -> Result<Self, ValidationError> {
        let entity_id = entity_id.into();
        if entity_id.trim().is_empty() {
            return Err(ValidationError::EmptyEntityId);
        }
        payload.validate()?;

        let event_id = derive_event_id(
            &entity_id,
            payload.kind(),
            payload.operation(),
            client_timestamp,
        );

        Ok(Self {
            app_id: APP_ID.to_string(),
            version: Self::CURRENT_VERSION,
            event_id,
            entity_id,
            issuer_account_id,
            client_timestamp,
            revision,
            payload,
            content_hash: None,
        })
    }

    /// The envelope kind, derived from the payload variant.
    pub fn kind(&self) -> EnvelopeKind {
        self.payload.kind()
    }

    /// The operation verb, derived from the payload variant.
    pub fn operation(&self) -> Operation {
        self.payload.operation()
    }

    /// Serialization view of the full envelope, including the hash.
    pub fn wire(&self) -> WireEnvelope<'_> {
        WireEnvelope {
            app_id: &self.app_id,
            kind: self.kind(),
            version: self.version,
            event_id: &self.event_id,
            entity_id: &self.entity_id,
            issuer_account_id: &self.issuer_account_id,
            client_timestamp: self.client_timestamp,
            revision: self.revision,
            payload: &self.payload,
            content_hash: self.content_hash.as_ref(),
        }
    }

    /// Serialize the sealed envelope for log submission.
    pub fn to_message_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.wire())
    }
}

/// Derive the deterministic event id for an intent.
pub fn derive_event_id(
    entity_id: &str,
    kind: EnvelopeKind,
    operation: Operation,
    client_timestamp: i64,
) -> String {
    format!("{entity_id}:{kind}:{operation}:{client_timestamp}")
}

/// Borrowed wire form of an [`Envelope`].
///
/// Field order here is the wire order. The canonicalizer in `shared-crypto`
/// keeps its own hash view; this one exists so the submitted message always
/// carries the derived `type` discriminant alongside the payload tag.
#[derive(Debug, Serialize)]
pub struct WireEnvelope<'a> {
    pub app_id: &'a str,
    #[serde(rename = "type")]
    pub kind: EnvelopeKind,
    pub version: u16,
    pub event_id: &'a str,
    pub entity_id: &'a str,
    pub issuer_account_id: &'a AccountId,
    pub client_timestamp: i64,
    pub revision: u64,
    pub payload: &'a EnvelopePayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<&'a ContentHash>,
}
