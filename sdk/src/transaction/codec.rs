//! # Transaction Codec
//!
//! Canonical byte layout of a transaction. This is what gets hashed and
//! signed, so it must match the chain bit for bit.
//!
//! ```text
//! offset size field
//! 0      1    type
//! 1      1    (version << 4) | subtype
//! 2      4    timestamp
//! 6      2    deadline (minutes)
//! 8      32   sender public key
//! 40     8    recipient
//! 48     8    amount
//! 56     8    fee
//! 64     64   signature (zeros when unsigned)
//! 128    4    appendix flags
//! 132    4    EC block height
//! 136    8    EC block id
//! 144    ..   attachment (version byte + body)
//! ..     ..   appendices in flag order (version byte + body each)
//! end-8  8    trailer
//! ```
//!
//! All integers are little-endian. Decoding is strict: truncated input,
//! trailing bytes, unknown flag bits, unknown types and unknown versions
//! are all errors naming the field that failed.

use thiserror::Error;
use tracing::trace;

use super::appendix::{Appendix, AppendixKind};
use super::builder::Transaction;
use super::types::Attachment;
use crate::config::{
    APPENDIX_VERSION, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH, SIGNATURE_OFFSET,
    TRANSACTION_HEADER_LENGTH, TRANSACTION_VERSION,
};
use crate::crypto::{ObjectId, PublicKey, Signature};

/// Errors from encoding or decoding transaction bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("truncated input reading {field}: needed {needed} bytes, {remaining} left")]
    Truncated {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },

    #[error("{0} unexpected bytes after the trailer")]
    TrailingBytes(usize),

    #[error("unknown appendix flag bits {0:#010x}")]
    UnknownAppendixFlags(u32),

    #[error("unknown transaction type {transaction_type}/{subtype}")]
    UnknownTransactionType { transaction_type: u8, subtype: u8 },

    #[error("unsupported {field} version {version}")]
    UnsupportedVersion { field: &'static str, version: u8 },

    #[error("{field} out of range: {value}")]
    FieldOutOfRange { field: &'static str, value: u64 },

    #[error("appendix {0} present more than once")]
    DuplicateAppendix(AppendixKind),

    #[error("{field} is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    #[error("transaction is not signed")]
    MissingSignature,

    #[error("expected unsigned bytes but the signature field is set")]
    UnexpectedSignature,
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Little-endian cursor over a byte slice. Every read names its field so
/// a failure says exactly where the input ran out.
pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub(crate) fn take(&mut self, n: usize, field: &'static str) -> Result<&'a [u8], CodecError> {
        if self.remaining() < n {
            return Err(CodecError::Truncated {
                field,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let out = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub(crate) fn array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, field)?);
        Ok(out)
    }

    pub(crate) fn u8(&mut self, field: &'static str) -> Result<u8, CodecError> {
        Ok(self.array::<1>(field)?[0])
    }

    pub(crate) fn u16(&mut self, field: &'static str) -> Result<u16, CodecError> {
        self.array(field).map(u16::from_le_bytes)
    }

    pub(crate) fn u32(&mut self, field: &'static str) -> Result<u32, CodecError> {
        self.array(field).map(u32::from_le_bytes)
    }

    pub(crate) fn u64(&mut self, field: &'static str) -> Result<u64, CodecError> {
        self.array(field).map(u64::from_le_bytes)
    }

    pub(crate) fn id(&mut self, field: &'static str) -> Result<ObjectId, CodecError> {
        self.u64(field).map(ObjectId)
    }

    pub(crate) fn public_key(&mut self, field: &'static str) -> Result<PublicKey, CodecError> {
        self.array::<PUBLIC_KEY_LENGTH>(field).map(PublicKey::from_bytes)
    }

    pub(crate) fn signature(&mut self, field: &'static str) -> Result<Signature, CodecError> {
        self.array::<SIGNATURE_LENGTH>(field).map(Signature::from_bytes)
    }

    /// Expect a specific version byte.
    pub(crate) fn version(&mut self, field: &'static str, expected: u8) -> Result<(), CodecError> {
        match self.u8(field)? {
            v if v == expected => Ok(()),
            version => Err(CodecError::UnsupportedVersion { field, version }),
        }
    }

    pub(crate) fn finish(self) -> Result<(), CodecError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(CodecError::TrailingBytes(n)),
        }
    }
}

// ---------------------------------------------------------------------------
// Encode / decode
// ---------------------------------------------------------------------------

/// Serialize `tx` with `signature` in the signature slot. Pass
/// [`Signature::ZERO`] for the unsigned form.
pub fn encode(tx: &Transaction, signature: &Signature) -> Result<Vec<u8>, CodecError> {
    if tx.version != TRANSACTION_VERSION {
        return Err(CodecError::UnsupportedVersion {
            field: "transaction",
            version: tx.version,
        });
    }
    let appendices = canonical_appendices(&tx.appendices)?;
    let flags = appendices.iter().fold(0u32, |acc, a| acc | a.kind().flag());

    let mut out = Vec::with_capacity(TRANSACTION_HEADER_LENGTH + 64);
    out.push(tx.attachment.transaction_type());
    out.push((tx.version << 4) | tx.attachment.subtype());
    out.extend_from_slice(&tx.timestamp.to_le_bytes());
    out.extend_from_slice(&tx.deadline.to_le_bytes());
    out.extend_from_slice(tx.sender_public_key.as_bytes());
    out.extend_from_slice(&tx.recipient.value().to_le_bytes());
    out.extend_from_slice(&tx.amount.to_le_bytes());
    out.extend_from_slice(&tx.fee.to_le_bytes());
    debug_assert_eq!(out.len(), SIGNATURE_OFFSET);
    out.extend_from_slice(signature.as_bytes());
    out.extend_from_slice(&flags.to_le_bytes());
    out.extend_from_slice(&tx.ec_block_height.to_le_bytes());
    out.extend_from_slice(&tx.ec_block_id.value().to_le_bytes());

    out.push(tx.attachment.version());
    tx.attachment.encode_body(&mut out)?;

    for appendix in appendices {
        out.push(APPENDIX_VERSION);
        appendix.encode_body(&mut out)?;
    }

    out.extend_from_slice(&tx.trailer.to_le_bytes());
    Ok(out)
}

/// Parse transaction bytes, returning the transaction and whatever sits in
/// the signature slot.
pub fn decode(bytes: &[u8]) -> Result<(Transaction, Signature), CodecError> {
    let mut r = ByteReader::new(bytes);

    let transaction_type = r.u8("type")?;
    let packed = r.u8("version/subtype")?;
    let version = packed >> 4;
    let subtype = packed & 0x0f;
    if version != TRANSACTION_VERSION {
        return Err(CodecError::UnsupportedVersion {
            field: "transaction",
            version,
        });
    }

    let timestamp = r.u32("timestamp")?;
    let deadline = r.u16("deadline")?;
    let sender_public_key = r.public_key("sender public key")?;
    let recipient = r.id("recipient")?;
    let amount = r.u64("amount")?;
    let fee = r.u64("fee")?;
    let signature = r.signature("signature")?;
    let flags = r.u32("flags")?;
    let ec_block_height = r.u32("ec block height")?;
    let ec_block_id = r.id("ec block id")?;

    let attachment = Attachment::decode(transaction_type, subtype, &mut r)?;

    let unknown = flags & !AppendixKind::KNOWN_FLAGS;
    if unknown != 0 {
        return Err(CodecError::UnknownAppendixFlags(unknown));
    }
    let mut appendices = Vec::new();
    for kind in AppendixKind::ALL {
        if flags & kind.flag() != 0 {
            r.version(kind.name(), APPENDIX_VERSION)?;
            appendices.push(Appendix::decode(kind, &mut r)?);
        }
    }

    let trailer = r.u64("trailer")?;
    r.finish()?;

    trace!(
        transaction_type,
        subtype,
        appendices = appendices.len(),
        "decoded transaction"
    );

    let tx = Transaction {
        version,
        timestamp,
        deadline,
        sender_public_key,
        recipient,
        amount,
        fee,
        ec_block_height,
        ec_block_id,
        attachment,
        appendices,
        trailer,
    };
    Ok((tx, signature))
}

/// Appendices in table order, rejecting repeats.
fn canonical_appendices(appendices: &[Appendix]) -> Result<Vec<&Appendix>, CodecError> {
    let mut sorted: Vec<&Appendix> = appendices.iter().collect();
    sorted.sort_by_key(|a| a.kind());
    for pair in sorted.windows(2) {
        if pair[0].kind() == pair[1].kind() {
            return Err(CodecError::DuplicateAppendix(pair[0].kind()));
        }
    }
    Ok(sorted)
}

/// Copy of signed bytes with the signature slot zeroed: exactly what the
/// signer signed.
pub(crate) fn strip_signature(bytes: &[u8]) -> Vec<u8> {
    let mut unsigned = bytes.to_vec();
    if let Some(slot) = unsigned.get_mut(SIGNATURE_OFFSET..SIGNATURE_OFFSET + SIGNATURE_LENGTH) {
        slot.fill(0);
    }
    unsigned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::appendix::Message;
    use crate::transaction::builder::TransactionBuilder;

    /// Unsigned payment with a public key announcement, from a live wallet.
    const ANNOUNCEMENT_TX: &str = "001015e33607a005b27b12f1982c6c57da981a4dcefe2ae75b00f0665b813e1b634c0b716e48524dad6e58700348a241002d31010000000040420f000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000040000004a800300397775e7050e6bd60001cfa1a9c50f968a5679afc1bf655a57c304303b0ebb8e1bb47ef9d466494ac117ffffffffffffff7f";

    /// Unsigned payment without appendices.
    const PLAIN_TX: &str = "0010a0ed3607a005b27b12f1982c6c57da981a4dcefe2ae75b00f0665b813e1b634c0b716e48524dac1119b939a5b31c00e1f5050000000040420f00000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000a7800300e01292c7e82a773f00ffffffffffffff7f";

    fn sender() -> PublicKey {
        PublicKey::from_hex("b27b12f1982c6c57da981a4dcefe2ae75b00f0665b813e1b634c0b716e48524d")
            .unwrap()
    }

    fn sample() -> Transaction {
        TransactionBuilder::payment(ObjectId(4644748344150906433), 200_000)
            .timestamp(120_000_000)
            .ec_block(229_450, ObjectId(0x1234_5678_9abc_def0))
            .build(sender())
    }

    #[test]
    fn decodes_known_plain_payment() {
        let bytes = hex::decode(PLAIN_TX).unwrap();
        assert_eq!(bytes.len(), 153);
        let (tx, sig) = decode(&bytes).unwrap();
        assert!(sig.is_zero());
        assert_eq!(tx.attachment, Attachment::OrdinaryPayment);
        assert_eq!(tx.version, 1);
        assert_eq!(tx.deadline, 1440);
        assert_eq!(tx.sender_public_key, sender());
        assert_eq!(tx.amount, 100_000_000);
        assert_eq!(tx.fee, 1_000_000);
        assert_eq!(tx.ec_block_height, 229_543);
        assert!(tx.appendices.is_empty());
        assert_eq!(tx.trailer, crate::config::DEFAULT_TRAILER);
        assert_eq!(encode(&tx, &sig).unwrap(), bytes);
    }

    #[test]
    fn decodes_known_announcement() {
        let bytes = hex::decode(ANNOUNCEMENT_TX).unwrap();
        assert_eq!(bytes.len(), 186);
        let (tx, _) = decode(&bytes).unwrap();
        assert_eq!(tx.amount, 20_000_000);
        assert_eq!(tx.flags(), AppendixKind::PublicKeyAnnouncement.flag());
        match &tx.appendices[..] {
            [Appendix::PublicKeyAnnouncement(pk)] => assert_eq!(
                pk.to_hex(),
                "cfa1a9c50f968a5679afc1bf655a57c304303b0ebb8e1bb47ef9d466494ac117"
            ),
            other => panic!("unexpected appendices {other:?}"),
        }
        assert_eq!(encode(&tx, &Signature::ZERO).unwrap(), bytes);
    }

    #[test]
    fn round_trip_without_appendices() {
        let tx = sample();
        let bytes = encode(&tx, &Signature::ZERO).unwrap();
        assert_eq!(bytes.len(), TRANSACTION_HEADER_LENGTH + 1 + 8);
        assert_eq!(decode(&bytes).unwrap().0, tx);
    }

    #[test]
    fn round_trip_with_one_and_many_appendices() {
        let mut tx = sample();
        tx.appendices.push(Appendix::PublicMessage(Message::text("hello")));
        let (back, _) = decode(&encode(&tx, &Signature::ZERO).unwrap()).unwrap();
        assert_eq!(back, tx);

        tx.appendices.push(Appendix::PublicNameAssignment {
            name: "sender@quantower.online".into(),
            signature: Signature::from_bytes([7; 64]),
        });
        tx.appendices.push(Appendix::PrivateNameAnnouncement(ObjectId(99)));
        tx.appendices.push(Appendix::PublicKeyAnnouncement(sender()));
        let (back, _) = decode(&encode(&tx, &Signature::ZERO).unwrap()).unwrap();
        // Decoding yields table order.
        let kinds: Vec<_> = back.appendices.iter().map(Appendix::kind).collect();
        assert_eq!(
            kinds,
            [
                AppendixKind::PublicMessage,
                AppendixKind::PublicKeyAnnouncement,
                AppendixKind::PrivateNameAnnouncement,
                AppendixKind::PublicNameAssignment,
            ]
        );
        assert_eq!(back.flags(), tx.flags());
    }

    #[test]
    fn appendix_order_does_not_change_bytes() {
        let mut a = sample();
        a.appendices = vec![
            Appendix::PublicKeyAnnouncement(sender()),
            Appendix::PublicMessage(Message::text("x")),
        ];
        let mut b = a.clone();
        b.appendices.reverse();
        assert_eq!(encode(&a, &Signature::ZERO), encode(&b, &Signature::ZERO));
    }

    #[test]
    fn duplicate_appendix_is_rejected() {
        let mut tx = sample();
        tx.appendices.push(Appendix::PublicMessage(Message::text("a")));
        tx.appendices.push(Appendix::PublicMessage(Message::text("b")));
        assert_eq!(
            encode(&tx, &Signature::ZERO),
            Err(CodecError::DuplicateAppendix(AppendixKind::PublicMessage))
        );
    }

    #[test]
    fn every_truncation_is_rejected() {
        let mut tx = sample();
        tx.appendices.push(Appendix::PublicMessage(Message::text("truncate me")));
        let bytes = encode(&tx, &Signature::ZERO).unwrap();
        for len in 0..bytes.len() {
            assert!(
                matches!(decode(&bytes[..len]), Err(CodecError::Truncated { .. })),
                "length {len}"
            );
        }
    }

    #[test]
    fn truncation_names_the_field() {
        let bytes = hex::decode(PLAIN_TX).unwrap();
        assert_eq!(
            decode(&bytes[..20]).unwrap_err(),
            CodecError::Truncated {
                field: "sender public key",
                needed: 32,
                remaining: 12
            }
        );
    }

    #[test]
    fn overlong_input_is_rejected() {
        let mut bytes = hex::decode(PLAIN_TX).unwrap();
        bytes.push(0);
        assert_eq!(decode(&bytes).unwrap_err(), CodecError::TrailingBytes(1));
    }

    #[test]
    fn unknown_flag_bits_are_rejected() {
        let mut bytes = hex::decode(PLAIN_TX).unwrap();
        bytes[128 + 1] = 0x01; // flag bit 8
        assert_eq!(
            decode(&bytes).unwrap_err(),
            CodecError::UnknownAppendixFlags(0x100)
        );
    }

    #[test]
    fn unknown_type_and_version_are_rejected() {
        let mut bytes = hex::decode(PLAIN_TX).unwrap();
        bytes[0] = 9;
        assert_eq!(
            decode(&bytes).unwrap_err(),
            CodecError::UnknownTransactionType {
                transaction_type: 9,
                subtype: 0
            }
        );

        let mut bytes = hex::decode(PLAIN_TX).unwrap();
        bytes[1] = 0x20;
        assert!(matches!(
            decode(&bytes).unwrap_err(),
            CodecError::UnsupportedVersion { version: 2, .. }
        ));

        let mut tx = sample();
        tx.version = 3;
        assert!(encode(&tx, &Signature::ZERO).is_err());
    }

    #[test]
    fn wrong_appendix_version_is_rejected() {
        let mut tx = sample();
        tx.appendices.push(Appendix::PrivateNameAnnouncement(ObjectId(1)));
        let mut bytes = encode(&tx, &Signature::ZERO).unwrap();
        // header + attachment version byte, then the appendix version byte
        bytes[TRANSACTION_HEADER_LENGTH + 1] = 2;
        assert!(matches!(
            decode(&bytes).unwrap_err(),
            CodecError::UnsupportedVersion { version: 2, .. }
        ));
    }

    #[test]
    fn strip_signature_zeroes_slot_only() {
        let tx = sample();
        let signed = encode(&tx, &Signature::from_bytes([0xaa; 64])).unwrap();
        let unsigned = encode(&tx, &Signature::ZERO).unwrap();
        assert_ne!(signed, unsigned);
        assert_eq!(strip_signature(&signed), unsigned);
    }
}
