//! # SHA-256 Content Hashing
//!
//! Digests canonical envelope bytes into the `sha256:<hex>` content hash.
//!
//! Hashing happens server-side only. A hash arriving on a client request
//! is never trusted; [`seal`] recomputes and overwrites unconditionally.

use sha2::{Digest, Sha256};

use shared_types::{ContentHash, Envelope};

use crate::canonical::{canonicalize, CanonicalizeError};

/// Hash arbitrary bytes with SHA-256 (one-shot).
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute the content hash of an envelope's canonical form.
pub fn hash_envelope(envelope: &Envelope) -> Result<ContentHash, CanonicalizeError> {
    let bytes = canonicalize(envelope)?;
    Ok(ContentHash::from_digest(sha256(&bytes)))
}

/// Compute and attach the content hash, replacing any existing value.
///
/// Returns the attached hash for convenience.
pub fn seal(envelope: &mut Envelope) -> Result<ContentHash, CanonicalizeError> {
    let hash = hash_envelope(envelope)?;
    envelope.content_hash = Some(hash);
    Ok(hash)
}
