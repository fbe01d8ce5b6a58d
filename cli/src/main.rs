// Copyright (c) 2026 Quantower LLC. MIT License.
// See LICENSE for details.

//! # Quantower CLI
//!
//! Entry point for the `quantower` binary. Parses arguments, initializes
//! logging and runs one offline subcommand:
//!
//! - `account`   : public key and account id for a passphrase
//! - `sign`      : sign hex bytes
//! - `verify`    : check a signature
//! - `full-hash` : full hash and id of a signed transaction
//! - `name-id`   : object id of a full name
//! - `pay`       : build and sign a payment
//! - `encrypt` / `decrypt` : passphrase encryption

mod cli;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;

use cli::QuantowerCli;
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = QuantowerCli::parse();
    logging::init_logging(&cli.log_level, LogFormat::from_str_lossy(&cli.log_format));

    let output = commands::run(cli.command)?;
    println!("{output}");
    Ok(())
}
