//! # Hashing & Object Identifiers
//!
//! SHA-256 is the only hash the chain uses. Every key, signature, message
//! key and identifier in this crate is built on the two functions below.
//!
//! ## Object ids
//!
//! Accounts, transactions and names are all identified by the same
//! construction: the first 8 bytes of a SHA-256 digest, read as a
//! little-endian `u64`, printed in unsigned decimal. [`ObjectId`] is that
//! value. There is exactly one derivation routine, [`ObjectId::derive`];
//! transaction ids skip the hashing step because the full hash already is a
//! digest ([`ObjectId::from_digest`]).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use crate::config::HASH_OUTPUT_LENGTH;

/// A 32-byte SHA-256 digest.
pub type Digest32 = [u8; HASH_OUTPUT_LENGTH];

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use quantower_sdk::crypto::sha256;
///
/// let hash = sha256(b"hello world");
/// assert_eq!(hash[0], 0xb9);
/// ```
pub fn sha256(data: &[u8]) -> Digest32 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash several byte slices as if they were concatenated.
///
/// Saves building a temporary buffer for `H(a || b)` constructions, which
/// the signature scheme and full-hash computation use constantly.
pub fn sha256_multi(parts: &[&[u8]]) -> Digest32 {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

// ---------------------------------------------------------------------------
// ObjectId
// ---------------------------------------------------------------------------

/// The chain's canonical unsigned 64-bit identifier.
///
/// Serializes as a decimal string because the values routinely exceed the
/// 2^53 range of JSON numbers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl ObjectId {
    /// Hash `content` and take the id from the digest.
    ///
    /// Account ids pass the public key, name ids pass the UTF-8 name.
    pub fn derive(content: &[u8]) -> Self {
        Self::from_digest(&sha256(content))
    }

    /// Read the id from the first 8 bytes of an existing digest,
    /// little-endian.
    pub fn from_digest(digest: &Digest32) -> Self {
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        Self(u64::from_le_bytes(head))
    }

    /// The raw numeric value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for ObjectId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<ObjectId> for u64 {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ObjectId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Id of a full alias/name such as `sender@quantower.online`.
pub fn name_id(full_name: &str) -> ObjectId {
    ObjectId::derive(full_name.as_bytes())
}
