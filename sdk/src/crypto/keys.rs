//! # Key Management
//!
//! Passphrase-derived Curve25519 keypairs.
//!
//! The chain has no key files. An account is whatever keypair falls out of
//! hashing its passphrase, so derivation must be a pure function: the same
//! passphrase gives the same private scalar, public key and account id on
//! every machine, forever.
//!
//! ```text
//! seed        = SHA-256(utf8(passphrase))
//! private key = clamp(seed)
//! public key  = u(private key * G)
//! account id  = ObjectId::derive(public key)
//! ```
//!
//! Private key bytes are never logged and never printed by `Debug`.

use curve25519_dalek::scalar::Scalar;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::trace;

use super::curve;
use super::hash::{sha256, ObjectId};
use super::signatures;
use crate::config::{PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};

/// Errors from parsing externally supplied key material.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid public key: expected {PUBLIC_KEY_LENGTH} bytes as hex")]
    InvalidPublicKey,

    #[error("invalid signature: expected {SIGNATURE_LENGTH} bytes as hex")]
    InvalidSignature,
}

/// A passphrase-derived keypair.
///
/// Holds the clamped private scalar, the public key, and the precomputed
/// signing scalar the chain's signature scheme multiplies by. Like every
/// secret-bearing type here it does not implement `Serialize`; export the
/// private key explicitly with [`KeyPair::private_key_bytes`] if you must.
///
/// # Examples
///
/// ```
/// use quantower_sdk::crypto::KeyPair;
///
/// let kp = KeyPair::from_passphrase("correct horse battery staple");
/// let sig = kp.sign(b"pay alice 5");
/// assert!(kp.verify(b"pay alice 5", &sig));
/// assert_eq!(kp, KeyPair::from_passphrase("correct horse battery staple"));
/// ```
#[derive(Clone)]
pub struct KeyPair {
    private_key: [u8; PRIVATE_KEY_LENGTH],
    public_key: PublicKey,
    signing_scalar: Scalar,
}

impl KeyPair {
    /// Derive the keypair for a passphrase.
    pub fn from_passphrase(passphrase: &str) -> Self {
        let kp = Self::from_private_key(sha256(passphrase.as_bytes()));
        trace!(public_key = %kp.public_key, "derived keypair from passphrase");
        kp
    }

    /// Build a keypair from raw private key bytes. The bytes are clamped,
    /// so any 32 bytes give a usable key.
    pub fn from_private_key(bytes: [u8; PRIVATE_KEY_LENGTH]) -> Self {
        let private_key = curve::clamp(bytes);
        let public_key = PublicKey(curve::base_multiply(&private_key));
        let signing_scalar = curve::signing_scalar(&private_key);
        Self {
            private_key,
            public_key,
            signing_scalar,
        }
    }

    /// The public half, safe to share.
    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// The account this keypair controls.
    pub fn account_id(&self) -> ObjectId {
        self.public_key.account_id()
    }

    /// Raw clamped private key bytes. Handle with care.
    pub fn private_key_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        self.private_key
    }

    pub(crate) fn signing_scalar(&self) -> &Scalar {
        &self.signing_scalar
    }

    /// Sign `message`. Deterministic: same key and message, same signature.
    pub fn sign(&self, message: &[u8]) -> Signature {
        signatures::sign(message, self)
    }

    /// Verify a signature against this keypair's public key.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        signatures::verify(signature, message, &self.public_key)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair(pub={})", self.public_key.to_hex())
    }
}

impl PartialEq for KeyPair {
    /// Keypairs are compared by public key only.
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key
    }
}

impl Eq for KeyPair {}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// A Curve25519 public key: the Montgomery u-coordinate, little-endian.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey(#[serde(with = "crate::hex_serde::array")] [u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// Account id: [`ObjectId::derive`] over the key bytes.
    pub fn account_id(&self) -> ObjectId {
        ObjectId::derive(&self.0)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse exactly 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// A 64-byte chain signature, `v || h`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature(#[serde(with = "crate::hex_serde::array")] [u8; SIGNATURE_LENGTH]);

impl Signature {
    /// The all-zero placeholder an unsigned transaction carries.
    pub const ZERO: Signature = Signature([0u8; SIGNATURE_LENGTH]);

    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| KeyError::InvalidSignature)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// Convenience functions
// ---------------------------------------------------------------------------

/// Public key for a passphrase.
pub fn public_key_from_passphrase(passphrase: &str) -> PublicKey {
    PublicKey(curve::base_multiply(&curve::clamp(sha256(passphrase.as_bytes()))))
}

/// Account id for a passphrase.
pub fn account_id(passphrase: &str) -> ObjectId {
    public_key_from_passphrase(passphrase).account_id()
}

/// Account id for a public key.
pub fn account_id_from_public_key(public_key: &PublicKey) -> ObjectId {
    public_key.account_id()
}

/// `true` if `s` is a well-formed hex public key.
pub fn is_public_key(s: &str) -> bool {
    PublicKey::from_hex(s).is_ok()
}
