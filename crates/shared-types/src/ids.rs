//! # Identifier Types
//!
//! Strongly-typed identifiers used throughout the write path.
//!
//! All three types serialize as their string form so the wire format stays
//! identical to the canon v1 envelopes consumed by downstream readers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// An external-identity account reference in `shard.realm.num` form
/// (e.g. `0.0.1001`).
///
/// The grammar is fixed: three dot-separated decimal components. Anything
/// else is rejected at construction, so an `AccountId` held anywhere in the
/// system is known-valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId {
    shard: u64,
    realm: u64,
    num: u64,
}

impl AccountId {
    /// Construct from raw components.
    pub fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }

    pub fn shard(&self) -> u64 {
        self.shard
    }

    pub fn realm(&self) -> u64 {
        self.realm
    }

    pub fn num(&self) -> u64 {
        self.num
    }
}

impl FromStr for AccountId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidAccountId {
            value: s.to_string(),
        };

        let mut parts = s.split('.');
        let shard = parts.next().ok_or_else(invalid)?;
        let realm = parts.next().ok_or_else(invalid)?;
        let num = parts.next().ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        // Reject empty components and non-digit characters before parsing so
        // values like "0..1" or "0.0.+1" never sneak through u64::from_str.
        for part in [shard, realm, num] {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
        }

        Ok(Self {
            shard: shard.parse().map_err(|_| invalid())?,
            realm: realm.parse().map_err(|_| invalid())?,
            num: num.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl TryFrom<String> for AccountId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.to_string()
    }
}

/// A logical channel identifier on the consensus log.
///
/// Opaque to this system: the registry hands them out and the submitter
/// passes them through. Stored as received from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(String);

impl TopicId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A SHA-256 content digest in `sha256:<64 lowercase hex>` form.
///
/// Always computed server-side over the canonical envelope bytes; a value
/// of this type is never taken from client input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Wrap a raw SHA-256 digest.
    pub fn from_digest(digest: [u8; 32]) -> Self {
        Self(digest)
    }

    /// The raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha256:{}", hex::encode(self.0))
    }
}

impl FromStr for ContentHash {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidContentHash {
            value: s.to_string(),
        };

        let hex_part = s.strip_prefix("sha256:").ok_or_else(invalid)?;
        if hex_part.len() != 64 {
            return Err(invalid());
        }
        let bytes = hex::decode(hex_part).map_err(|_| invalid())?;
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&bytes);
        Ok(Self(digest))
    }
}

impl TryFrom<String> for ContentHash {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_round_trip() {
        let id: AccountId = "0.0.1001".parse().unwrap();
        assert_eq!(id, AccountId::new(0, 0, 1001));
        assert_eq!(id.to_string(), "0.0.1001");
    }

    #[test]
    fn test_account_id_rejects_malformed() {
        for bad in ["", "not-an-id", "0.0", "0.0.1.2", "0..1", "0.0.+1", "0.0.12a"] {
            assert!(bad.parse::<AccountId>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_content_hash_round_trip() {
        let hash = ContentHash::from_digest([0xAB; 32]);
        let formatted = hash.to_string();
        assert!(formatted.starts_with("sha256:abab"));
        assert_eq!(formatted.parse::<ContentHash>().unwrap(), hash);
    }

    #[test]
    fn test_content_hash_rejects_malformed() {
        for bad in ["", "sha256:", "sha256:zz", "md5:00", "sha256:abcd"] {
            assert!(bad.parse::<ContentHash>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_content_hash_serde_as_string() {
        let hash = ContentHash::from_digest([0x01; 32]);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{hash}\""));
        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }
}
