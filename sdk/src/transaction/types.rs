//! Core type definitions for transactions.
//!
//! The chain identifies an operation by a `(type, subtype)` byte pair. Each
//! pair has its own attachment: a version byte followed by a fixed-layout
//! body. [`Attachment`] carries both the discriminant and the body, so a
//! transaction can never disagree with itself about what it is.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::codec::{ByteReader, CodecError};
use crate::config::{ASSET_DESCRIPTION_HASH_LENGTH, MAX_ASSET_DECIMALS, MAX_ASSET_URL_LENGTH};
use crate::crypto::ObjectId;

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// Top-level transaction family, the first header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Payment,
    Messaging,
    ColoredCoins,
    AccountControl,
}

impl TransactionType {
    pub fn code(self) -> u8 {
        match self {
            Self::Payment => 0,
            Self::Messaging => 1,
            Self::ColoredCoins => 2,
            Self::AccountControl => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Payment),
            1 => Some(Self::Messaging),
            2 => Some(Self::ColoredCoins),
            4 => Some(Self::AccountControl),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payment => write!(f, "Payment"),
            Self::Messaging => write!(f, "Messaging"),
            Self::ColoredCoins => write!(f, "ColoredCoins"),
            Self::AccountControl => write!(f, "AccountControl"),
        }
    }
}

// ---------------------------------------------------------------------------
// Attachment
// ---------------------------------------------------------------------------

/// Type-specific payload of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attachment {
    /// Plain coin transfer. Empty body.
    OrdinaryPayment,
    /// Data-only transaction; the content travels in a message appendix.
    ArbitraryMessage,
    /// Create a new asset. Its id is the id of the issuing transaction.
    AssetIssuance {
        description_url: String,
        description_hash: Option<[u8; 32]>,
        quantity: u64,
        decimals: u8,
        dillutable: bool,
    },
    /// Move `quantity` units of `asset` to the recipient.
    AssetTransfer { asset: ObjectId, quantity: u64 },
    /// Offer `quantity` of `asset` for `price` units of `currency` each.
    AskOrderPlacement(OrderPlacement),
    /// Ask for `quantity` of `asset` paying `price` units of `currency` each.
    BidOrderPlacement(OrderPlacement),
    /// Withdraw an open ask order.
    AskOrderCancellation { order: ObjectId },
    /// Withdraw an open bid order.
    BidOrderCancellation { order: ObjectId },
    /// Lease effective balance to the recipient for `period` blocks.
    EffectiveBalanceLeasing { period: u16 },
}

impl Attachment {
    pub fn kind(&self) -> TransactionType {
        match self {
            Self::OrdinaryPayment => TransactionType::Payment,
            Self::ArbitraryMessage => TransactionType::Messaging,
            Self::AssetIssuance { .. }
            | Self::AssetTransfer { .. }
            | Self::AskOrderPlacement(_)
            | Self::BidOrderPlacement(_)
            | Self::AskOrderCancellation { .. }
            | Self::BidOrderCancellation { .. } => TransactionType::ColoredCoins,
            Self::EffectiveBalanceLeasing { .. } => TransactionType::AccountControl,
        }
    }

    /// First header byte.
    pub fn transaction_type(&self) -> u8 {
        self.kind().code()
    }

    /// Low nibble of the second header byte.
    pub fn subtype(&self) -> u8 {
        match self {
            Self::OrdinaryPayment | Self::ArbitraryMessage => 0,
            Self::AssetIssuance { .. } => 0,
            Self::AssetTransfer { .. } => 2,
            Self::AskOrderPlacement(_) => 3,
            Self::BidOrderPlacement(_) => 4,
            Self::AskOrderCancellation { .. } => 5,
            Self::BidOrderCancellation { .. } => 6,
            Self::EffectiveBalanceLeasing { .. } => 0,
        }
    }

    /// Version byte written before the body. Empty attachments are version 0.
    pub fn version(&self) -> u8 {
        match self {
            Self::OrdinaryPayment | Self::ArbitraryMessage => 0,
            _ => 1,
        }
    }

    pub(crate) fn encode_body(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        match self {
            Self::OrdinaryPayment | Self::ArbitraryMessage => {}
            Self::AssetIssuance {
                description_url,
                description_hash,
                quantity,
                decimals,
                dillutable,
            } => {
                if description_url.len() > MAX_ASSET_URL_LENGTH {
                    return Err(CodecError::FieldOutOfRange {
                        field: "description url length",
                        value: description_url.len() as u64,
                    });
                }
                if *decimals > MAX_ASSET_DECIMALS {
                    return Err(CodecError::FieldOutOfRange {
                        field: "decimals",
                        value: u64::from(*decimals),
                    });
                }
                out.push(description_url.len() as u8);
                out.extend_from_slice(description_url.as_bytes());
                match description_hash {
                    Some(hash) => {
                        out.push(ASSET_DESCRIPTION_HASH_LENGTH as u8);
                        out.extend_from_slice(hash);
                    }
                    None => out.push(0),
                }
                out.extend_from_slice(&quantity.to_le_bytes());
                out.push(*decimals);
                out.push(u8::from(*dillutable));
            }
            Self::AssetTransfer { asset, quantity } => {
                out.extend_from_slice(&asset.value().to_le_bytes());
                out.extend_from_slice(&quantity.to_le_bytes());
            }
            Self::AskOrderPlacement(order) | Self::BidOrderPlacement(order) => {
                order.encode(out);
            }
            Self::AskOrderCancellation { order } | Self::BidOrderCancellation { order } => {
                out.extend_from_slice(&order.value().to_le_bytes());
            }
            Self::EffectiveBalanceLeasing { period } => {
                out.extend_from_slice(&period.to_le_bytes());
            }
        }
        Ok(())
    }

    /// Read the version byte and body for `(transaction_type, subtype)`.
    pub(crate) fn decode(
        transaction_type: u8,
        subtype: u8,
        r: &mut ByteReader<'_>,
    ) -> Result<Self, CodecError> {
        let unknown = CodecError::UnknownTransactionType {
            transaction_type,
            subtype,
        };
        let kind = TransactionType::from_code(transaction_type).ok_or(unknown.clone())?;
        let attachment = match (kind, subtype) {
            (TransactionType::Payment, 0) => {
                r.version("attachment", 0)?;
                Self::OrdinaryPayment
            }
            (TransactionType::Messaging, 0) => {
                r.version("attachment", 0)?;
                Self::ArbitraryMessage
            }
            (TransactionType::ColoredCoins, 0) => {
                r.version("attachment", 1)?;
                decode_issuance(r)?
            }
            (TransactionType::ColoredCoins, 2) => {
                r.version("attachment", 1)?;
                Self::AssetTransfer {
                    asset: r.id("asset")?,
                    quantity: r.u64("quantity")?,
                }
            }
            (TransactionType::ColoredCoins, 3) => {
                r.version("attachment", 1)?;
                Self::AskOrderPlacement(OrderPlacement::decode(r)?)
            }
            (TransactionType::ColoredCoins, 4) => {
                r.version("attachment", 1)?;
                Self::BidOrderPlacement(OrderPlacement::decode(r)?)
            }
            (TransactionType::ColoredCoins, 5) => {
                r.version("attachment", 1)?;
                Self::AskOrderCancellation {
                    order: r.id("order")?,
                }
            }
            (TransactionType::ColoredCoins, 6) => {
                r.version("attachment", 1)?;
                Self::BidOrderCancellation {
                    order: r.id("order")?,
                }
            }
            (TransactionType::AccountControl, 0) => {
                r.version("attachment", 1)?;
                Self::EffectiveBalanceLeasing {
                    period: r.u16("leasing period")?,
                }
            }
            _ => return Err(unknown),
        };
        Ok(attachment)
    }
}

fn decode_issuance(r: &mut ByteReader<'_>) -> Result<Attachment, CodecError> {
    let url_len = usize::from(r.u8("description url length")?);
    let url = r.take(url_len, "description url")?;
    let description_url = String::from_utf8(url.to_vec()).map_err(|_| CodecError::InvalidUtf8 {
        field: "description url",
    })?;
    let description_hash = match r.u8("description hash length")? {
        0 => None,
        32 => Some(r.array::<32>("description hash")?),
        other => {
            return Err(CodecError::FieldOutOfRange {
                field: "description hash length",
                value: u64::from(other),
            })
        }
    };
    let quantity = r.u64("quantity")?;
    let decimals = r.u8("decimals")?;
    if decimals > MAX_ASSET_DECIMALS {
        return Err(CodecError::FieldOutOfRange {
            field: "decimals",
            value: u64::from(decimals),
        });
    }
    let dillutable = match r.u8("dillutable")? {
        0 => false,
        1 => true,
        other => {
            return Err(CodecError::FieldOutOfRange {
                field: "dillutable",
                value: u64::from(other),
            })
        }
    };
    Ok(Attachment::AssetIssuance {
        description_url,
        description_hash,
        quantity,
        decimals,
        dillutable,
    })
}

// ---------------------------------------------------------------------------
// OrderPlacement
// ---------------------------------------------------------------------------

/// Body shared by ask and bid placements. `price` is in `currency` units per
/// whole `asset` unit; `expiration` is a chain timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlacement {
    pub currency: ObjectId,
    pub asset: ObjectId,
    pub quantity: u64,
    pub price: u64,
    pub expiration: u32,
}

impl OrderPlacement {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.currency.value().to_le_bytes());
        out.extend_from_slice(&self.asset.value().to_le_bytes());
        out.extend_from_slice(&self.quantity.to_le_bytes());
        out.extend_from_slice(&self.price.to_le_bytes());
        out.extend_from_slice(&self.expiration.to_le_bytes());
    }

    fn decode(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            currency: r.id("currency")?,
            asset: r.id("asset")?,
            quantity: r.u64("quantity")?,
            price: r.u64("price")?,
            expiration: r.u32("expiration")?,
        })
    }
}

impl fmt::Display for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrdinaryPayment => write!(f, "OrdinaryPayment"),
            Self::ArbitraryMessage => write!(f, "ArbitraryMessage"),
            Self::AssetIssuance {
                quantity, decimals, ..
            } => write!(f, "AssetIssuance({quantity} units, {decimals} decimals)"),
            Self::AskOrderPlacement(o) => {
                write!(f, "AskOrderPlacement({} of {} at {})", o.quantity, o.asset, o.price)
            }
            Self::BidOrderPlacement(o) => {
                write!(f, "BidOrderPlacement({} of {} at {})", o.quantity, o.asset, o.price)
            }
            Self::AssetTransfer { asset, quantity } => {
                write!(f, "AssetTransfer({quantity} of {asset})")
            }
            Self::AskOrderCancellation { order } => write!(f, "AskOrderCancellation({order})"),
            Self::BidOrderCancellation { order } => write!(f, "BidOrderCancellation({order})"),
            Self::EffectiveBalanceLeasing { period } => {
                write!(f, "EffectiveBalanceLeasing({period} blocks)")
            }
        }
    }
}
