//! # Transaction Module
//!
//! Construction, canonical encoding, fees, and signing for chain
//! transactions.
//!
//! ## Architecture
//!
//! ```text
//! types.rs    : TransactionType and the per-(type, subtype) Attachment
//! appendix.rs : optional appendices selected by the flags word
//! codec.rs    : the canonical byte layout, strict decoding
//! fee.rs      : static minimum-fee table
//! builder.rs  : Transaction and the fluent TransactionBuilder
//! signing.rs  : SignedTransaction, full hash, id, broadcast payload
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build**: [`TransactionBuilder`] fills defaults (timestamp, deadline,
//!    minimum fee) and yields an unsigned [`Transaction`].
//! 2. **Sign**: [`Transaction::sign`] serializes with a zeroed signature
//!    slot, signs those bytes, and derives the full hash and id.
//! 3. **Broadcast**: [`SignedTransaction::broadcast_payload`] is what the
//!    transport layer submits.
//!
//! Amounts and fees are `u64` in the smallest unit throughout.

pub mod appendix;
pub mod builder;
pub mod codec;
pub mod fee;
pub mod signing;
pub mod types;

pub use appendix::{Appendix, AppendixKind, Message};
pub use builder::{Transaction, TransactionBuilder};
pub use codec::{decode, encode, CodecError};
pub use fee::FeeSchedule;
pub use signing::{BroadcastPayload, SignedTransaction, TransactionError};
pub use types::{Attachment, OrderPlacement, TransactionType};
