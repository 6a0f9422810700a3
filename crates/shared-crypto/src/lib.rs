//! # Shared Crypto
//!
//! Canonicalization and content hashing for intent envelopes.
//!
//! The two halves are deliberately separate: [`canonical`] produces the
//! deterministic byte form of an envelope's logical fields, and
//! [`hashing`] digests those bytes into the `sha256:<hex>` content hash
//! carried on the wire and in the projection.

pub mod canonical;
pub mod hashing;

pub use canonical::{canonicalize, CanonicalizeError};
pub use hashing::{hash_envelope, seal, sha256};
