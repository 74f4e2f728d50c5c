use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};

use wincrypto::{AesCipher, AesConfig, AesKey, AesPadding, IvPolicy};

use super::read_data;

/**
    Legacy AES-CBC commands.
*/
#[derive(Args)]
pub struct AesCommand {
    #[command(subcommand)]
    command: AesSubcommand,
}

#[derive(Subcommand)]
enum AesSubcommand {
    /// Encrypt data; prints hex ciphertext.
    Encrypt(AesArgs),
    /// Decrypt data; prints hex plaintext.
    Decrypt(AesArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum IvMode {
    /// Random IV written as the first ciphertext block.
    Random,
    /// All-zero IV, not transmitted.
    Zero,
}

#[derive(Args)]
struct AesArgs {
    /// AES key as hex (16, 24 or 32 bytes), or @file holding a PLAINTEXTKEYBLOB.
    #[arg(short, long)]
    key: String,

    /// IV handling.
    #[arg(long, value_enum, default_value = "random")]
    iv: IvMode,

    /// Disable PKCS#7 padding; data must be a multiple of 16 bytes.
    #[arg(long)]
    no_padding: bool,

    /// Input data as hex, or @file.
    data: String,
}

impl AesArgs {
    fn key(&self) -> Result<AesKey> {
        match self.key.strip_prefix('@') {
            Some(path) => {
                let blob =
                    std::fs::read(path).with_context(|| format!("failed to read {path}"))?;
                wincrypto::import_aes_key_blob(&blob).context("failed to parse AES key blob")
            }
            None => {
                let bytes = hex::decode(&self.key).context("AES key must be hex")?;
                AesKey::new(bytes).context("invalid AES key")
            }
        }
    }

    fn cipher(&self) -> AesCipher {
        let iv = match self.iv {
            IvMode::Random => IvPolicy::RandomPrefixed,
            IvMode::Zero => IvPolicy::Fixed([0u8; 16]),
        };
        let padding = if self.no_padding {
            AesPadding::None
        } else {
            AesPadding::Pkcs7
        };
        AesCipher::new(AesConfig::new(iv, padding))
    }
}

impl AesCommand {
    pub fn run(self) -> Result<()> {
        let output = match self.command {
            AesSubcommand::Encrypt(args) => {
                let (key, data) = (args.key()?, read_data(&args.data)?);
                args.cipher().encrypt(&key, &data).context("AES encryption failed")?
            }
            AesSubcommand::Decrypt(args) => {
                let (key, data) = (args.key()?, read_data(&args.data)?);
                args.cipher().decrypt(&key, &data).context("AES decryption failed")?
            }
        };
        println!("{}", hex::encode(output));
        Ok(())
    }
}
