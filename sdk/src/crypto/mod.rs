//! # Cryptographic Primitives
//!
//! Everything the chain's accounts and transactions are built on:
//!
//! - **SHA-256** for every digest and identifier.
//! - **Curve25519** (X25519 ladder) for passphrase-derived keys and ECDH.
//! - **KCDSA-style signatures** over the same curve, bit-compatible with
//!   the chain's verifier.
//! - **AES-256-GCM** for encrypted messages and notes.
//!
//! All operations are synchronous and side-effect free apart from the
//! random nonces drawn by the encryption helpers.

pub mod cache;
pub mod curve;
pub mod encryption;
pub mod hash;
pub mod keys;
pub mod random;
pub mod signatures;

pub use cache::{KeyCache, KeyCacheConfig};
pub use encryption::{
    decrypt_message, decrypt_note, decrypt_text, encrypt_binary, encrypt_message, encrypt_note,
    passphrase_decrypt, passphrase_encrypt, shared_key, EncryptedMessage, EncryptionError,
    PassphraseEncrypted,
};
pub use hash::{name_id, sha256, sha256_multi, Digest32, ObjectId};
pub use keys::{
    account_id, account_id_from_public_key, is_public_key, public_key_from_passphrase, KeyError,
    KeyPair, PublicKey, Signature,
};
pub use random::{random_u16_values, random_u32_values, random_u8_values};
pub use signatures::{full_hash, sign, transaction_id, verify};
