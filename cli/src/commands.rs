//! Subcommand handlers.
//!
//! Each handler returns the text to print on stdout so the binary stays a
//! thin shell around them.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::info;

use quantower_sdk::amount::parse_units;
use quantower_sdk::crypto::{
    self, name_id, passphrase_decrypt, passphrase_encrypt, KeyPair, ObjectId,
    PassphraseEncrypted, PublicKey, Signature,
};
use quantower_sdk::transaction::TransactionBuilder;

use crate::cli::{
    Commands, DecryptArgs, EncryptArgs, FullHashArgs, NameIdArgs, PassphraseArgs, PayArgs,
    SignArgs, VerifyArgs,
};

pub fn run(command: Commands) -> Result<String> {
    match command {
        Commands::Account(args) => account(args),
        Commands::Sign(args) => sign(args),
        Commands::Verify(args) => verify(args),
        Commands::FullHash(args) => full_hash(args),
        Commands::NameId(args) => Ok(name(args)),
        Commands::Pay(args) => pay(args),
        Commands::Encrypt(args) => encrypt(args),
        Commands::Decrypt(args) => decrypt(args),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountOutput {
    account_id: ObjectId,
    public_key: PublicKey,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FullHashOutput {
    full_hash: String,
    transaction_id: ObjectId,
}

fn account(args: PassphraseArgs) -> Result<String> {
    let keys = KeyPair::from_passphrase(&args.passphrase);
    let output = AccountOutput {
        account_id: keys.account_id(),
        public_key: keys.public_key(),
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

fn sign(args: SignArgs) -> Result<String> {
    let message = decode_hex("message", &args.message)?;
    let keys = KeyPair::from_passphrase(&args.key.passphrase);
    Ok(keys.sign(&message).to_hex())
}

fn verify(args: VerifyArgs) -> Result<String> {
    let message = decode_hex("message", &args.message)?;
    let signature = Signature::from_hex(&args.signature).context("signature")?;
    let public_key = PublicKey::from_hex(&args.public_key).context("public key")?;
    if !crypto::verify(&signature, &message, &public_key) {
        bail!("signature is not valid for {}", public_key.account_id());
    }
    Ok("valid".to_string())
}

fn full_hash(args: FullHashArgs) -> Result<String> {
    let unsigned = decode_hex("unsigned bytes", &args.unsigned)?;
    let signature = Signature::from_hex(&args.signature).context("signature")?;
    let hash = crypto::full_hash(&unsigned, &signature);
    let output = FullHashOutput {
        full_hash: hex::encode(hash),
        transaction_id: ObjectId::from_digest(&hash),
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

fn name(args: NameIdArgs) -> String {
    name_id(&args.name).to_string()
}

fn pay(args: PayArgs) -> Result<String> {
    let amount = parse_units(&args.amount).context("amount")?;
    let keys = KeyPair::from_passphrase(&args.key.passphrase);

    let mut builder = TransactionBuilder::payment(args.recipient, amount).deadline(args.deadline);
    if let Some(fee) = &args.fee {
        builder = builder.fee(parse_units(fee).context("fee")?);
    }
    if let Some(timestamp) = args.timestamp {
        builder = builder.timestamp(timestamp);
    }
    if let Some(message) = &args.message {
        builder = builder.public_message(message);
    }

    let signed = builder.sign(&keys)?;
    info!(
        id = %signed.id(),
        recipient = %args.recipient,
        amount,
        fee = signed.transaction().fee,
        "payment signed"
    );
    Ok(serde_json::to_string_pretty(&signed.broadcast_payload())?)
}

fn encrypt(args: EncryptArgs) -> Result<String> {
    let encrypted = passphrase_encrypt(&args.text, &args.key.passphrase)?;
    Ok(encrypted.to_string())
}

fn decrypt(args: DecryptArgs) -> Result<String> {
    let payload: PassphraseEncrypted = args.payload.parse()?;
    let text = passphrase_decrypt(&payload, &args.key.passphrase)
        .context("wrong passphrase or corrupted payload")?;
    Ok(text)
}

fn decode_hex(what: &str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value).with_context(|| format!("{what} is not valid hex"))
}
