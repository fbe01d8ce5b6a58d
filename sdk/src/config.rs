//! # Protocol Configuration & Constants
//!
//! Every magic number the SDK relies on lives here. The transaction layout
//! constants must agree with the chain's consensus code byte for byte, so
//! treat this file as read-only unless the chain itself changes.

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Curve25519 private scalar length in bytes.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// Curve25519 public key length (Montgomery u-coordinate) in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Signature length: two 32-byte scalars `v || h`.
pub const SIGNATURE_LENGTH: usize = 64;

/// SHA-256 output length in bytes.
pub const HASH_OUTPUT_LENGTH: usize = 32;

/// Per-message nonce mixed into the ECDH shared secret. The chain stores
/// 32 bytes for every encrypted appendix.
pub const MESSAGE_NONCE_LENGTH: usize = 32;

/// AES-256-GCM key length in bytes.
pub const AES_KEY_LENGTH: usize = 32;

/// AES-256-GCM nonce (IV) length in bytes.
pub const AES_NONCE_LENGTH: usize = 12;

/// AES-256-GCM authentication tag length in bytes.
pub const AES_TAG_LENGTH: usize = 16;

// ---------------------------------------------------------------------------
// Chain Time
// ---------------------------------------------------------------------------

/// Genesis of the chain clock, 2013-11-24T12:00:00Z, as Unix seconds.
/// Transaction timestamps count seconds from this instant.
pub const EPOCH_BEGINNING: i64 = 1_385_294_400;

/// Default transaction deadline in minutes (one day).
pub const DEFAULT_DEADLINE: u16 = 1440;

// ---------------------------------------------------------------------------
// Amounts & Fees
// ---------------------------------------------------------------------------

/// Number of fractional digits in a whole coin.
pub const DECIMALS: u8 = 8;

/// Units per whole coin (10^8).
pub const ONE_COIN: u64 = 100_000_000;

/// Base fee for every transaction type without a dedicated entry.
pub const DEFAULT_FEE: u64 = ONE_COIN / 100;

/// Base fee for issuing a new asset.
pub const ASSET_ISSUANCE_FEE: u64 = 0;

pub const ASSET_TRANSFER_FEE: u64 = DEFAULT_FEE;
pub const ORDER_PLACEMENT_FEE: u64 = DEFAULT_FEE;
pub const ORDER_CANCELLATION_FEE: u64 = DEFAULT_FEE;
pub const EFFECTIVE_BALANCE_LEASING_FEE: u64 = DEFAULT_FEE;

/// Surcharge per public message appendix.
pub const MESSAGE_APPENDIX_FEE: u64 = 0;

/// Surcharge per encrypted message appendix (to recipient or to self).
pub const ENCRYPTED_MESSAGE_APPENDIX_FEE: u64 = 0;

/// Surcharge per public key announcement.
pub const PUBLIC_KEY_ANNOUNCEMENT_APPENDIX_FEE: u64 = 0;

pub const PRIVATE_NAME_ANNOUNCEMENT_APPENDIX_FEE: u64 = 0;
pub const PRIVATE_NAME_ASSIGNMENT_APPENDIX_FEE: u64 = 0;
pub const PUBLIC_NAME_ANNOUNCEMENT_APPENDIX_FEE: u64 = 0;
pub const PUBLIC_NAME_ASSIGNMENT_APPENDIX_FEE: u64 = 0;

// ---------------------------------------------------------------------------
// Transaction Layout
// ---------------------------------------------------------------------------

/// Current transaction format version, packed into the high nibble of the
/// second header byte.
pub const TRANSACTION_VERSION: u8 = 1;
const _: () = assert!(TRANSACTION_VERSION < 16);

/// Fixed header size: everything up to and including the EC block id.
pub const TRANSACTION_HEADER_LENGTH: usize = 144;

/// Byte offset of the signature inside the header.
pub const SIGNATURE_OFFSET: usize = 64;

/// Version byte written in front of every appendix body.
pub const APPENDIX_VERSION: u8 = 1;

/// Word closing every serialized transaction. Wallets write `i64::MAX`.
pub const DEFAULT_TRAILER: u64 = i64::MAX as u64;

/// Longest public name an appendix can carry (one length byte).
pub const MAX_NAME_LENGTH: usize = u8::MAX as usize;

/// Largest message body an appendix can carry. The top bit of the
/// length word is the text flag.
pub const MAX_MESSAGE_LENGTH: usize = i32::MAX as usize;

/// Longest asset description URL (one length byte).
pub const MAX_ASSET_URL_LENGTH: usize = u8::MAX as usize;

/// Length of an asset description hash when present.
pub const ASSET_DESCRIPTION_HASH_LENGTH: usize = 32;

/// Most fractional digits an asset may declare.
pub const MAX_ASSET_DECIMALS: u8 = 8;

// ---------------------------------------------------------------------------
// Key Cache
// ---------------------------------------------------------------------------

/// Default number of passphrase-derived keypairs kept by a `KeyCache`.
pub const DEFAULT_KEY_CACHE_CAPACITY: usize = 64;
