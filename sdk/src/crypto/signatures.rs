//! # Digital Signatures
//!
//! The chain's signature scheme: a KCDSA-style construction over
//! Curve25519 where the per-message nonce is derived from the message and
//! the signing key, never from an RNG.
//!
//! ```text
//! m  = H(message)
//! x  = clamp(H(m || s))          s = signing scalar of the keypair
//! Y  = u(x * G)
//! h  = H(m || Y)
//! v  = (x - h) * s  mod l
//! signature = v || h
//! ```
//!
//! Verification recomputes `Y' = u(v * P + h * G)` from the public key `P`
//! and accepts iff `H(m || Y') == h`. It is a predicate: malformed input is
//! simply `false`.
//!
//! The same bytes have to come out as the chain's own implementation
//! produces, so none of the steps above may be "improved".
//!
//! ## Full hash
//!
//! A signed transaction is identified by `H(unsigned_bytes || H(signature))`.
//! Its first 8 bytes give the transaction id.

use curve25519_dalek::scalar::Scalar;
use tracing::trace;

use super::curve;
use super::hash::{sha256, sha256_multi, Digest32, ObjectId};
use super::keys::{KeyPair, PublicKey, Signature};
use crate::config::SIGNATURE_LENGTH;

/// Sign a message with a keypair.
///
/// # Example
///
/// ```
/// use quantower_sdk::crypto::{sign, verify, KeyPair};
///
/// let keypair = KeyPair::from_passphrase("user1");
/// let signature = sign(b"send 100 to alice", &keypair);
/// assert!(verify(&signature, b"send 100 to alice", &keypair.public_key()));
/// ```
pub fn sign(message: &[u8], keypair: &KeyPair) -> Signature {
    let s = keypair.signing_scalar();
    let m = sha256(message);
    let x = curve::clamp(sha256_multi(&[&m, s.as_bytes()]));
    let y = curve::base_multiply(&x);
    let h = sha256_multi(&[&m, &y]);
    let v = (Scalar::from_bytes_mod_order(x) - Scalar::from_bytes_mod_order(h)) * s;

    let mut out = [0u8; SIGNATURE_LENGTH];
    out[..32].copy_from_slice(v.as_bytes());
    out[32..].copy_from_slice(&h);
    Signature::from_bytes(out)
}

/// Verify a signature over `message` against `public_key`.
///
/// Returns `false` for any mismatch, including a non-canonical `v` scalar
/// or a public key that is not a canonical curve coordinate.
pub fn verify(signature: &Signature, message: &[u8], public_key: &PublicKey) -> bool {
    let bytes = signature.as_bytes();
    let mut v_bytes = [0u8; 32];
    let mut h = [0u8; 32];
    v_bytes.copy_from_slice(&bytes[..32]);
    h.copy_from_slice(&bytes[32..]);

    let Some(v) = Option::<Scalar>::from(Scalar::from_canonical_bytes(v_bytes)) else {
        trace!("rejecting signature with non-canonical scalar");
        return false;
    };
    let Some(point) = curve::lift_public_key(public_key.as_bytes()) else {
        trace!(%public_key, "rejecting signature for invalid public key");
        return false;
    };

    let y = curve::double_multiply(&v, &point, &Scalar::from_bytes_mod_order(h));
    let m = sha256(message);
    sha256_multi(&[&m, &y]) == h
}

/// Full hash of a signed transaction: `H(unsigned || H(signature))`.
pub fn full_hash(unsigned_bytes: &[u8], signature: &Signature) -> Digest32 {
    let signature_hash = sha256(signature.as_bytes());
    sha256_multi(&[unsigned_bytes, &signature_hash])
}

/// Transaction id: the object id read from the full hash.
pub fn transaction_id(unsigned_bytes: &[u8], signature: &Signature) -> ObjectId {
    ObjectId::from_digest(&full_hash(unsigned_bytes, signature))
}
