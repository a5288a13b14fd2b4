//! Key and salt generation CLI for `sealed-fields`.
//!
//! Prints fresh secrets for operator consumption; nothing is written to
//! disk and no other surface exists here.

#![warn(clippy::pedantic, clippy::nursery)]

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use clap::{Parser, Subcommand};
use rand::rngs::OsRng;
use rand::RngCore;
use sealed_fields::keyring::{KeyRing, KEY_ENV, SALT_ENV};
use secrecy::ExposeSecret;

/// Salt token size in bytes. The salt is not key material; 16 bytes of
/// entropy is plenty to de-correlate blind indexes across deployments.
const SALT_SIZE: usize = 16;

#[derive(Parser)]
#[command(name = "sealed-fields")]
#[command(about = "sealed-fields key management CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a fresh symmetric key for the key ring
    Keygen,
    /// Generate a fresh blind-index salt token
    Saltgen,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Keygen => {
            let key = KeyRing::generate_key();
            println!("{}", URL_SAFE.encode(key.expose_secret()));
            eprintln!("Set {KEY_ENV} to this value (prepend it to rotate an existing ring).");
        }
        Commands::Saltgen => {
            let mut salt = [0u8; SALT_SIZE];
            OsRng.fill_bytes(&mut salt);
            println!("{}", URL_SAFE.encode(salt));
            eprintln!("Set {SALT_ENV} to this value before writing any searchable field.");
        }
    }

    Ok(())
}
