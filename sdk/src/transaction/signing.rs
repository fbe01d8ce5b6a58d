//! Transaction signing and the immutable signed form.
//!
//! Signing is a separate step from building because the keypair may not be
//! available at construction time (hardware wallet, remote signer). The
//! signed bytes are always the unsigned bytes with the signature spliced
//! into its slot, so re-serializing a [`SignedTransaction`] is idempotent
//! and the unsigned form it reports is exactly what was signed.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::builder::{Transaction, TransactionBuilder};
use super::codec::{self, CodecError};
use crate::config::{SIGNATURE_LENGTH, SIGNATURE_OFFSET};
use crate::crypto::{self, Digest32, KeyPair, ObjectId, Signature};

/// Errors that can occur while signing or loading a signed transaction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The keypair does not own the transaction's sender public key.
    #[error("keypair does not match sender {expected}")]
    SenderMismatch { expected: ObjectId },
}

// ---------------------------------------------------------------------------
// SignedTransaction
// ---------------------------------------------------------------------------

/// A transaction together with its signature and derived identifiers.
///
/// There are no setters: once signed, nothing about the transaction can
/// change without producing a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    transaction: Transaction,
    signature: Signature,
    unsigned_bytes: Vec<u8>,
    full_hash: Digest32,
    id: ObjectId,
}

impl SignedTransaction {
    fn assemble(transaction: Transaction, signature: Signature, unsigned_bytes: Vec<u8>) -> Self {
        let full_hash = crypto::full_hash(&unsigned_bytes, &signature);
        let id = ObjectId::from_digest(&full_hash);
        Self {
            transaction,
            signature,
            unsigned_bytes,
            full_hash,
            id,
        }
    }

    /// Parse signed transaction bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let (transaction, signature) = codec::decode(bytes)?;
        if signature.is_zero() {
            return Err(CodecError::MissingSignature);
        }
        Ok(Self::assemble(
            transaction,
            signature,
            codec::strip_signature(bytes),
        ))
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn full_hash(&self) -> &Digest32 {
        &self.full_hash
    }

    pub fn full_hash_hex(&self) -> String {
        hex::encode(self.full_hash)
    }

    /// The bytes that were signed.
    pub fn unsigned_bytes(&self) -> &[u8] {
        &self.unsigned_bytes
    }

    /// Final signed bytes, ready for broadcast.
    pub fn bytes(&self) -> Vec<u8> {
        let mut out = self.unsigned_bytes.clone();
        out[SIGNATURE_OFFSET..SIGNATURE_OFFSET + SIGNATURE_LENGTH]
            .copy_from_slice(self.signature.as_bytes());
        out
    }

    /// Check the signature against the sender public key in the
    /// transaction.
    pub fn verify(&self) -> bool {
        crypto::verify(
            &self.signature,
            &self.unsigned_bytes,
            &self.transaction.sender_public_key,
        )
    }

    /// What the transport layer submits to the network.
    pub fn broadcast_payload(&self) -> BroadcastPayload {
        BroadcastPayload {
            transaction_bytes: self.bytes(),
            transaction_id: self.id,
            full_hash: self.full_hash,
        }
    }

    pub fn into_transaction(self) -> Transaction {
        self.transaction
    }
}

/// Everything a broadcast needs: signed bytes plus the identifiers the
/// network will report back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastPayload {
    #[serde(with = "crate::hex_serde::bytes")]
    pub transaction_bytes: Vec<u8>,
    pub transaction_id: ObjectId,
    #[serde(with = "crate::hex_serde::array")]
    pub full_hash: Digest32,
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

impl Transaction {
    /// Sign with `keypair`, which must own the sender public key.
    pub fn sign(&self, keypair: &KeyPair) -> Result<SignedTransaction, TransactionError> {
        if keypair.public_key() != self.sender_public_key {
            return Err(TransactionError::SenderMismatch {
                expected: self.sender_id(),
            });
        }
        let unsigned_bytes = self.unsigned_bytes()?;
        let signature = keypair.sign(&unsigned_bytes);
        let signed = SignedTransaction::assemble(self.clone(), signature, unsigned_bytes);
        debug!(
            id = %signed.id,
            sender = %signed.transaction.sender_id(),
            attachment = %signed.transaction.attachment,
            "signed transaction"
        );
        Ok(signed)
    }

    /// Attach a signature produced elsewhere over [`Transaction::unsigned_bytes`].
    /// The signature is not checked; call [`SignedTransaction::verify`].
    pub fn with_signature(self, signature: Signature) -> Result<SignedTransaction, CodecError> {
        if signature.is_zero() {
            return Err(CodecError::MissingSignature);
        }
        let unsigned_bytes = self.unsigned_bytes()?;
        Ok(SignedTransaction::assemble(self, signature, unsigned_bytes))
    }
}

impl TransactionBuilder {
    /// Build for the keypair's public key and sign in one step.
    pub fn sign(self, keypair: &KeyPair) -> Result<SignedTransaction, TransactionError> {
        self.build(keypair.public_key()).sign(keypair)
    }
}
