//! # CLI Interface
//!
//! Command-line argument structure for `quantower` using `clap` derive.
//! Every subcommand works offline: nothing here opens a socket.

use clap::{Args, Parser, Subcommand};

use quantower_sdk::config::DEFAULT_DEADLINE;
use quantower_sdk::crypto::ObjectId;

/// Offline key, signing and encryption tool for the Quantower ledger.
///
/// Results go to stdout (JSON where there is more than one value), logs go
/// to stderr.
#[derive(Parser, Debug)]
#[command(
    name = "quantower",
    about = "Offline signing tool for the Quantower ledger",
    version,
    propagate_version = true
)]
pub struct QuantowerCli {
    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, global = true, env = "QUANTOWER_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log output format: `pretty` or `json`.
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the public key and account id for a passphrase.
    Account(PassphraseArgs),
    /// Sign hex-encoded bytes.
    Sign(SignArgs),
    /// Check a signature over hex-encoded bytes.
    Verify(VerifyArgs),
    /// Full hash and transaction id of unsigned bytes plus a signature.
    FullHash(FullHashArgs),
    /// Object id of a full name.
    NameId(NameIdArgs),
    /// Build and sign a payment, printing the broadcast payload.
    Pay(PayArgs),
    /// Encrypt text under a passphrase.
    Encrypt(EncryptArgs),
    /// Decrypt `iv:ciphertext` produced by `encrypt`.
    Decrypt(DecryptArgs),
}

#[derive(Args, Debug)]
pub struct PassphraseArgs {
    /// Account passphrase. Prefer the environment variable over the flag so
    /// it stays out of shell history.
    #[arg(long, short = 'p', env = "QUANTOWER_PASSPHRASE", hide_env_values = true)]
    pub passphrase: String,
}

#[derive(Args, Debug)]
pub struct SignArgs {
    /// Message bytes, hex encoded.
    pub message: String,

    #[command(flatten)]
    pub key: PassphraseArgs,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Message bytes, hex encoded.
    pub message: String,

    /// 64-byte signature, hex encoded.
    pub signature: String,

    /// 32-byte signer public key, hex encoded.
    pub public_key: String,
}

#[derive(Args, Debug)]
pub struct FullHashArgs {
    /// Unsigned transaction bytes, hex encoded.
    pub unsigned: String,

    /// 64-byte signature, hex encoded.
    pub signature: String,
}

#[derive(Args, Debug)]
pub struct NameIdArgs {
    /// Full name, e.g. `alice@quantower.online`.
    pub name: String,
}

#[derive(Args, Debug)]
pub struct PayArgs {
    /// Recipient account id.
    pub recipient: ObjectId,

    /// Amount in coins, e.g. `12.5`.
    pub amount: String,

    /// Attach a public text message.
    #[arg(long, short = 'm')]
    pub message: Option<String>,

    /// Fee in coins. Defaults to the minimum fee.
    #[arg(long)]
    pub fee: Option<String>,

    /// Validity window in minutes.
    #[arg(long, default_value_t = DEFAULT_DEADLINE)]
    pub deadline: u16,

    /// Chain timestamp in seconds. Defaults to now.
    #[arg(long)]
    pub timestamp: Option<u32>,

    #[command(flatten)]
    pub key: PassphraseArgs,
}

#[derive(Args, Debug)]
pub struct EncryptArgs {
    /// Plaintext to encrypt.
    pub text: String,

    #[command(flatten)]
    pub key: PassphraseArgs,
}

#[derive(Args, Debug)]
pub struct DecryptArgs {
    /// `iv_hex:ciphertext_hex`.
    pub payload: String,

    #[command(flatten)]
    pub key: PassphraseArgs,
}
