//! # Canonical Serialization
//!
//! Produces the byte form an envelope is hashed over.
//!
//! ## INVARIANT: Deterministic Hashing
//!
//! The canonical bytes are a pure function of the envelope's logical
//! fields, excluding `content_hash` itself. Determinism comes from
//! serializing a view struct with a fixed field declaration order rather
//! than re-serializing any client-supplied JSON, so map insertion order and
//! serializer defaults cannot leak into the digest. Two envelopes that are
//! field-for-field equal (ignoring the hash) canonicalize to identical
//! bytes.

use serde::Serialize;
use thiserror::Error;

use shared_types::{AccountId, Envelope, EnvelopeKind, EnvelopePayload};

/// Canonicalization failure. Practically unreachable for well-formed
/// envelopes; surfaced rather than swallowed so nothing is ever hashed on
/// a best-effort basis.
#[derive(Debug, Error)]
pub enum CanonicalizeError {
    #[error("Envelope serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The hash view: every logical field, fixed order, no `content_hash`.
#[derive(Serialize)]
struct CanonicalView<'a> {
    app_id: &'a str,
    #[serde(rename = "type")]
    kind: EnvelopeKind,
    version: u16,
    event_id: &'a str,
    entity_id: &'a str,
    issuer_account_id: &'a AccountId,
    client_timestamp: i64,
    revision: u64,
    payload: &'a EnvelopePayload,
}

/// Serialize an envelope's logical fields to canonical bytes.
pub fn canonicalize(envelope: &Envelope) -> Result<Vec<u8>, CanonicalizeError> {
    let view = CanonicalView {
        app_id: &envelope.app_id,
        kind: envelope.kind(),
        version: envelope.version,
        event_id: &envelope.event_id,
        entity_id: &envelope.entity_id,
        issuer_account_id: &envelope.issuer_account_id,
        client_timestamp: envelope.client_timestamp,
        revision: envelope.revision,
        payload: &envelope.payload,
    };
    Ok(serde_json::to_vec(&view)?)
}
