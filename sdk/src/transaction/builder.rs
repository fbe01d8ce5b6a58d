//! Transaction construction via the builder pattern.
//!
//! [`TransactionBuilder`] fills in everything a wallet normally leaves
//! alone (version, deadline, timestamp, fee from the fee table, trailer)
//! and produces an unsigned [`Transaction`]. Signing happens in
//! [`super::signing`].

use serde::{Deserialize, Serialize};

use super::appendix::{Appendix, Message};
use super::codec::{self, CodecError};
use super::fee::FeeSchedule;
use super::types::{Attachment, OrderPlacement, TransactionType};
use crate::config::{DEFAULT_DEADLINE, DEFAULT_TRAILER, TRANSACTION_VERSION};
use crate::crypto::{EncryptedMessage, ObjectId, PublicKey, Signature};
use crate::time::epoch_time;

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// An unsigned transaction.
///
/// `type`, `subtype` and the appendix `flags` are not stored: they are
/// derived from [`Transaction::attachment`] and [`Transaction::appendices`]
/// so they cannot drift. The signature lives in
/// [`super::signing::SignedTransaction`], which is immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Format version, packed into the high nibble of header byte 1.
    pub version: u8,
    /// Seconds since the chain epoch.
    pub timestamp: u32,
    /// Minutes after `timestamp` during which the transaction is valid.
    pub deadline: u16,
    pub sender_public_key: PublicKey,
    pub recipient: ObjectId,
    /// Amount in units (10^8 per coin).
    pub amount: u64,
    /// Fee in units.
    pub fee: u64,
    /// Economic clustering anchor: a recent block height and its id.
    pub ec_block_height: u32,
    pub ec_block_id: ObjectId,
    pub attachment: Attachment,
    /// Encoded in table order regardless of the order here.
    pub appendices: Vec<Appendix>,
    /// Closing word of the byte layout.
    pub trailer: u64,
}

impl Transaction {
    pub fn transaction_type(&self) -> TransactionType {
        self.attachment.kind()
    }

    pub fn subtype(&self) -> u8 {
        self.attachment.subtype()
    }

    /// Appendix bitmask as it appears in the header.
    pub fn flags(&self) -> u32 {
        self.appendices.iter().fold(0, |acc, a| acc | a.kind().flag())
    }

    /// Account id of the sender.
    pub fn sender_id(&self) -> ObjectId {
        self.sender_public_key.account_id()
    }

    /// Canonical bytes with a zeroed signature slot. These are what get
    /// signed.
    pub fn unsigned_bytes(&self) -> Result<Vec<u8>, CodecError> {
        codec::encode(self, &Signature::ZERO)
    }

    /// Parse unsigned bytes. Fails if the signature slot is not zero.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let (tx, signature) = codec::decode(bytes)?;
        if !signature.is_zero() {
            return Err(CodecError::UnexpectedSignature);
        }
        Ok(tx)
    }

    /// Minimum fee for this transaction under `schedule`.
    pub fn minimum_fee(&self, schedule: &FeeSchedule) -> u64 {
        schedule.minimum_fee(self)
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for unsigned [`Transaction`]s.
///
/// ```
/// use quantower_sdk::crypto::{KeyPair, ObjectId};
/// use quantower_sdk::transaction::TransactionBuilder;
///
/// let keys = KeyPair::from_passphrase("user1");
/// let signed = TransactionBuilder::payment(ObjectId(4644748344150906433), 200_000)
///     .public_message("thanks")
///     .sign(&keys)
///     .unwrap();
/// assert!(signed.verify());
/// ```
///
/// Defaults: version 1, deadline 1440 minutes, timestamp now, fee from
/// [`FeeSchedule::default`], EC block 0/0, trailer `i64::MAX`.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    attachment: Attachment,
    recipient: ObjectId,
    amount: u64,
    fee: Option<u64>,
    fee_schedule: FeeSchedule,
    deadline: u16,
    timestamp: Option<u32>,
    ec_block_height: u32,
    ec_block_id: ObjectId,
    appendices: Vec<Appendix>,
    trailer: u64,
}

impl TransactionBuilder {
    pub fn new(attachment: Attachment) -> Self {
        Self {
            attachment,
            recipient: ObjectId(0),
            amount: 0,
            fee: None,
            fee_schedule: FeeSchedule::default(),
            deadline: DEFAULT_DEADLINE,
            timestamp: None,
            ec_block_height: 0,
            ec_block_id: ObjectId(0),
            appendices: Vec::new(),
            trailer: DEFAULT_TRAILER,
        }
    }

    /// Coin transfer of `amount` units.
    pub fn payment(recipient: ObjectId, amount: u64) -> Self {
        Self::new(Attachment::OrdinaryPayment)
            .recipient(recipient)
            .amount(amount)
    }

    /// Public text message to `recipient`.
    pub fn arbitrary_message(recipient: ObjectId, text: &str) -> Self {
        Self::new(Attachment::ArbitraryMessage)
            .recipient(recipient)
            .public_message(text)
    }

    /// Encrypted message to the owner of `recipient`. Encrypt it first with
    /// [`crate::crypto::encrypt_message`].
    pub fn private_message(recipient: &PublicKey, message: EncryptedMessage) -> Self {
        Self::new(Attachment::ArbitraryMessage)
            .recipient(recipient.account_id())
            .appendix(Appendix::EncryptedMessage(message))
    }

    /// Encrypted note to self. The recipient is filled in at build time.
    pub fn private_message_to_self(message: EncryptedMessage) -> Self {
        Self::new(Attachment::ArbitraryMessage).appendix(Appendix::EncryptedMessageToSelf(message))
    }

    /// Issue a new asset of `quantity` indivisible units with `decimals`
    /// display digits.
    pub fn asset_issuance(
        description_url: &str,
        description_hash: Option<[u8; 32]>,
        quantity: u64,
        decimals: u8,
        dillutable: bool,
    ) -> Self {
        Self::new(Attachment::AssetIssuance {
            description_url: description_url.to_string(),
            description_hash,
            quantity,
            decimals,
            dillutable,
        })
    }

    pub fn asset_transfer(recipient: ObjectId, asset: ObjectId, quantity: u64) -> Self {
        Self::new(Attachment::AssetTransfer { asset, quantity }).recipient(recipient)
    }

    /// Sell `quantity` of `asset` at `price` units of `currency` each,
    /// valid until the `expiration` timestamp.
    pub fn place_ask_order(
        currency: ObjectId,
        asset: ObjectId,
        quantity: u64,
        price: u64,
        expiration: u32,
    ) -> Self {
        Self::new(Attachment::AskOrderPlacement(OrderPlacement {
            currency,
            asset,
            quantity,
            price,
            expiration,
        }))
    }

    pub fn place_bid_order(
        currency: ObjectId,
        asset: ObjectId,
        quantity: u64,
        price: u64,
        expiration: u32,
    ) -> Self {
        Self::new(Attachment::BidOrderPlacement(OrderPlacement {
            currency,
            asset,
            quantity,
            price,
            expiration,
        }))
    }

    pub fn cancel_ask_order(order: ObjectId) -> Self {
        Self::new(Attachment::AskOrderCancellation { order })
    }

    pub fn cancel_bid_order(order: ObjectId) -> Self {
        Self::new(Attachment::BidOrderCancellation { order })
    }

    /// Lease effective balance to `recipient` for `period` blocks.
    pub fn lease_balance(recipient: ObjectId, period: u16) -> Self {
        Self::new(Attachment::EffectiveBalanceLeasing { period }).recipient(recipient)
    }

    pub fn recipient(mut self, recipient: ObjectId) -> Self {
        self.recipient = recipient;
        self
    }

    pub fn amount(mut self, amount: u64) -> Self {
        self.amount = amount;
        self
    }

    /// Explicit fee. Without it the fee schedule's minimum is used.
    pub fn fee(mut self, fee: u64) -> Self {
        self.fee = Some(fee);
        self
    }

    pub fn fee_schedule(mut self, schedule: FeeSchedule) -> Self {
        self.fee_schedule = schedule;
        self
    }

    pub fn deadline(mut self, minutes: u16) -> Self {
        self.deadline = minutes;
        self
    }

    /// Seconds since the chain epoch. Defaults to now.
    pub fn timestamp(mut self, timestamp: u32) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn ec_block(mut self, height: u32, id: ObjectId) -> Self {
        self.ec_block_height = height;
        self.ec_block_id = id;
        self
    }

    pub fn trailer(mut self, trailer: u64) -> Self {
        self.trailer = trailer;
        self
    }

    pub fn appendix(mut self, appendix: Appendix) -> Self {
        self.appendices.push(appendix);
        self
    }

    pub fn public_message(self, text: &str) -> Self {
        self.appendix(Appendix::PublicMessage(Message::text(text)))
    }

    pub fn announce_public_key(self, key: PublicKey) -> Self {
        self.appendix(Appendix::PublicKeyAnnouncement(key))
    }

    /// Produce the unsigned transaction for `sender`.
    pub fn build(self, sender: PublicKey) -> Transaction {
        let self_addressed = self
            .appendices
            .iter()
            .any(|a| matches!(a, Appendix::EncryptedMessageToSelf(_)));
        let recipient = if self_addressed && self.recipient == ObjectId(0) {
            sender.account_id()
        } else {
            self.recipient
        };

        let mut tx = Transaction {
            version: TRANSACTION_VERSION,
            timestamp: self.timestamp.unwrap_or_else(epoch_time),
            deadline: self.deadline,
            sender_public_key: sender,
            recipient,
            amount: self.amount,
            fee: 0,
            ec_block_height: self.ec_block_height,
            ec_block_id: self.ec_block_id,
            attachment: self.attachment,
            appendices: self.appendices,
            trailer: self.trailer,
        };
        tx.fee = self
            .fee
            .unwrap_or_else(|| self.fee_schedule.minimum_fee(&tx));
        tx
    }
}
