use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::commands::{AesCommand, ConvertCommand, InspectCommand, RsaCommand};

/**
    CryptoAPI key blob and legacy-format crypto tool.
*/
#[derive(Parser)]
#[command(name = "wincrypto")]
pub struct Cli {
    /// Log library debug events to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect a key blob file.
    Inspect(InspectCommand),
    /// Convert a PEM or DER RSA key into a key blob.
    Convert(ConvertCommand),
    /// Legacy AES-CBC.
    Aes(AesCommand),
    /// Legacy-order RSA PKCS#1 v1.5.
    Rsa(RsaCommand),
}

impl Cli {
    pub fn run(self) -> Result<()> {
        init_tracing(self.verbose);
        match self.command {
            Command::Inspect(cmd) => cmd.run(),
            Command::Convert(cmd) => cmd.run(),
            Command::Aes(cmd) => cmd.run(),
            Command::Rsa(cmd) => cmd.run(),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
