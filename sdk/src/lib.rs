// Copyright (c) 2026 Quantower LLC. MIT License.
// See LICENSE for details.

//! # Quantower SDK
//!
//! Client-side core for the Quantower ledger: everything a wallet needs to
//! turn a passphrase into a signed, broadcast-ready transaction without
//! ever talking to a node.
//!
//! ## Architecture
//!
//! - **crypto**: SHA-256, object ids, passphrase keys, signatures, ECDH
//!   message encryption.
//! - **transaction**: attachments, appendices, the canonical byte codec,
//!   fees, building and signing.
//! - **amount**: decimal amounts to chain units and back.
//! - **time**: chain epoch timestamps.
//! - **config**: protocol constants.
//!
//! ## Example
//!
//! ```
//! use quantower_sdk::crypto::{KeyPair, ObjectId};
//! use quantower_sdk::transaction::TransactionBuilder;
//! use quantower_sdk::amount::parse_units;
//!
//! let keys = KeyPair::from_passphrase("correct horse battery staple");
//! let signed = TransactionBuilder::payment(ObjectId(42), parse_units("1.5").unwrap())
//!     .sign(&keys)
//!     .unwrap();
//! assert!(signed.verify());
//! ```
//!
//! Every operation is synchronous and free of shared mutable state, so all
//! of it is safe to call from any number of threads. The one exception is
//! [`crypto::KeyCache`], which is internally locked.

pub mod amount;
pub mod config;
pub mod crypto;
mod hex_serde;
pub mod time;
pub mod transaction;
