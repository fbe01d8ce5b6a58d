//! # Message & Note Encryption
//!
//! Two independent schemes, both sealing with AES-256-GCM.
//!
//! ## Shared-secret messages
//!
//! Sender and recipient agree on `X25519(my_private, their_public)`, which
//! both sides compute identically. Each message draws a fresh 32-byte nonce
//! that is XORed into the shared secret before hashing, so every message is
//! sealed under its own key:
//!
//! ```text
//! key  = SHA-256(shared_secret XOR nonce)
//! data = aes_iv(12) || AES-256-GCM(key, aes_iv, plaintext)
//! ```
//!
//! With an all-zero nonce the key reduces to [`shared_key`], the plain hash
//! of the shared point. The 32-byte nonce is what encrypted appendices store
//! on chain next to `data`.
//!
//! ## Passphrase mode
//!
//! Legacy scheme kept for compatibility: the AES key is the bare SHA-256 of
//! the passphrase, with no salt and no work factor. Only a fresh random IV
//! distinguishes two encryptions. Do not build new features on it.
//!
//! ## Compatibility
//!
//! Both schemes are AES-256-GCM with a 12-byte IV and no compression.
//! Wallets on the chain that seal messages with any other cipher or
//! compress before sealing cannot read what this module produces, and this
//! module cannot read theirs.
//!
//! ## Failures
//!
//! GCM authenticates, so a wrong key, a flipped bit or a truncated payload
//! is always `EncryptionError::DecryptFailed`, never garbage plaintext.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::curve;
use super::hash::sha256;
use super::keys::{KeyPair, PublicKey};
use super::random::random_array;
use crate::config::{AES_KEY_LENGTH, AES_NONCE_LENGTH, MESSAGE_NONCE_LENGTH};

/// Errors that can occur during encryption/decryption.
///
/// A wrong key and a corrupted ciphertext are the same error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncryptionError {
    #[error("encryption failed")]
    EncryptFailed,

    #[error("decryption failed -- wrong key or corrupted ciphertext")]
    DecryptFailed,

    #[error("ciphertext too short: must be at least {AES_NONCE_LENGTH} bytes")]
    CiphertextTooShort,

    #[error("decrypted payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("malformed encrypted payload: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Shared-secret messages
// ---------------------------------------------------------------------------

/// An encrypted message as carried by the encrypted message appendices.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedMessage {
    /// AES IV followed by ciphertext and tag.
    #[serde(with = "crate::hex_serde::bytes")]
    pub data: Vec<u8>,
    /// Per-message nonce mixed into the shared secret.
    #[serde(with = "crate::hex_serde::array")]
    pub nonce: [u8; MESSAGE_NONCE_LENGTH],
    /// Whether the plaintext is UTF-8 text.
    pub is_text: bool,
}

impl fmt::Debug for EncryptedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedMessage")
            .field("data_len", &self.data.len())
            .field("nonce", &hex::encode(self.nonce))
            .field("is_text", &self.is_text)
            .finish()
    }
}

/// `SHA-256(X25519(my_private, their_public))`, identical on both sides.
pub fn shared_key(my_keys: &KeyPair, their_public: &PublicKey) -> [u8; AES_KEY_LENGTH] {
    message_key(my_keys, their_public, &[0u8; MESSAGE_NONCE_LENGTH])
}

fn message_key(
    my_keys: &KeyPair,
    their_public: &PublicKey,
    nonce: &[u8; MESSAGE_NONCE_LENGTH],
) -> [u8; AES_KEY_LENGTH] {
    let mut secret = curve::shared_point(&my_keys.private_key_bytes(), their_public.as_bytes());
    for (byte, n) in secret.iter_mut().zip(nonce) {
        *byte ^= n;
    }
    sha256(&secret)
}

fn encrypt_for(
    plaintext: &[u8],
    is_text: bool,
    their_public: &PublicKey,
    my_keys: &KeyPair,
) -> Result<EncryptedMessage, EncryptionError> {
    let nonce = random_array::<MESSAGE_NONCE_LENGTH>();
    let key = message_key(my_keys, their_public, &nonce);
    let data = seal(&key, plaintext)?;
    Ok(EncryptedMessage {
        data,
        nonce,
        is_text,
    })
}

/// Encrypt UTF-8 text for `their_public`.
pub fn encrypt_message(
    text: &str,
    their_public: &PublicKey,
    my_keys: &KeyPair,
) -> Result<EncryptedMessage, EncryptionError> {
    encrypt_for(text.as_bytes(), true, their_public, my_keys)
}

/// Encrypt raw bytes for `their_public`.
pub fn encrypt_binary(
    bytes: &[u8],
    their_public: &PublicKey,
    my_keys: &KeyPair,
) -> Result<EncryptedMessage, EncryptionError> {
    encrypt_for(bytes, false, their_public, my_keys)
}

/// Encrypt a note only the owner of `my_keys` can read.
pub fn encrypt_note(text: &str, my_keys: &KeyPair) -> Result<EncryptedMessage, EncryptionError> {
    encrypt_message(text, &my_keys.public_key(), my_keys)
}

/// Decrypt a message from (or sent to) `their_public`.
pub fn decrypt_message(
    message: &EncryptedMessage,
    their_public: &PublicKey,
    my_keys: &KeyPair,
) -> Result<Vec<u8>, EncryptionError> {
    let key = message_key(my_keys, their_public, &message.nonce);
    open(&key, &message.data)
}

/// Decrypt a message and interpret it as UTF-8 text.
pub fn decrypt_text(
    message: &EncryptedMessage,
    their_public: &PublicKey,
    my_keys: &KeyPair,
) -> Result<String, EncryptionError> {
    let bytes = decrypt_message(message, their_public, my_keys)?;
    String::from_utf8(bytes).map_err(|_| EncryptionError::InvalidUtf8)
}

/// Decrypt a note written with [`encrypt_note`].
pub fn decrypt_note(message: &EncryptedMessage, my_keys: &KeyPair) -> Result<String, EncryptionError> {
    decrypt_text(message, &my_keys.public_key(), my_keys)
}

// ---------------------------------------------------------------------------
// Passphrase mode
// ---------------------------------------------------------------------------

/// Output of [`passphrase_encrypt`].
///
/// The compact string form is `iv_hex:ciphertext_hex`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassphraseEncrypted {
    #[serde(with = "crate::hex_serde::bytes")]
    pub ciphertext: Vec<u8>,
    #[serde(with = "crate::hex_serde::array")]
    pub iv: [u8; AES_NONCE_LENGTH],
}

impl fmt::Display for PassphraseEncrypted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", hex::encode(self.iv), hex::encode(&self.ciphertext))
    }
}

impl FromStr for PassphraseEncrypted {
    type Err = EncryptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (iv_hex, ct_hex) = s
            .split_once(':')
            .ok_or_else(|| EncryptionError::Malformed("missing ':' separator".into()))?;
        let mut iv = [0u8; AES_NONCE_LENGTH];
        hex::decode_to_slice(iv_hex, &mut iv)
            .map_err(|e| EncryptionError::Malformed(format!("iv: {e}")))?;
        let ciphertext =
            hex::decode(ct_hex).map_err(|e| EncryptionError::Malformed(format!("ciphertext: {e}")))?;
        Ok(Self { ciphertext, iv })
    }
}

/// Encrypt `text` under a key hashed straight from `passphrase`.
pub fn passphrase_encrypt(
    text: &str,
    passphrase: &str,
) -> Result<PassphraseEncrypted, EncryptionError> {
    let key = sha256(passphrase.as_bytes());
    let iv = random_array::<AES_NONCE_LENGTH>();
    let ciphertext = cipher(&key)?
        .encrypt(Nonce::from_slice(&iv), text.as_bytes())
        .map_err(|_| EncryptionError::EncryptFailed)?;
    Ok(PassphraseEncrypted { ciphertext, iv })
}

/// Reverse [`passphrase_encrypt`].
pub fn passphrase_decrypt(
    payload: &PassphraseEncrypted,
    passphrase: &str,
) -> Result<String, EncryptionError> {
    let key = sha256(passphrase.as_bytes());
    let plaintext = cipher(&key)?
        .decrypt(Nonce::from_slice(&payload.iv), payload.ciphertext.as_slice())
        .map_err(|_| EncryptionError::DecryptFailed)?;
    String::from_utf8(plaintext).map_err(|_| EncryptionError::InvalidUtf8)
}

// ---------------------------------------------------------------------------
// AES-256-GCM
// ---------------------------------------------------------------------------

fn cipher(key: &[u8; AES_KEY_LENGTH]) -> Result<Aes256Gcm, EncryptionError> {
    Aes256Gcm::new_from_slice(key).map_err(|_| EncryptionError::EncryptFailed)
}

/// Returns `iv || ciphertext`.
fn seal(key: &[u8; AES_KEY_LENGTH], plaintext: &[u8]) -> Result<Vec<u8>, EncryptionError> {
    let iv = random_array::<AES_NONCE_LENGTH>();
    let ciphertext = cipher(key)?
        .encrypt(Nonce::from_slice(&iv), plaintext)
        .map_err(|_| EncryptionError::EncryptFailed)?;

    let mut out = Vec::with_capacity(AES_NONCE_LENGTH + ciphertext.len());
    out.extend_from_slice(&iv);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

fn open(key: &[u8; AES_KEY_LENGTH], data: &[u8]) -> Result<Vec<u8>, EncryptionError> {
    if data.len() < AES_NONCE_LENGTH {
        return Err(EncryptionError::CiphertextTooShort);
    }
    let (iv, ciphertext) = data.split_at(AES_NONCE_LENGTH);
    cipher(key)?
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| EncryptionError::DecryptFailed)
}
