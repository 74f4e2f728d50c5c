use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use wincrypto::{HashAlgorithm, KeyBlob, PrivateKey, PublicKey, RsaCipher};

use super::{load_blob, read_data};

/**
    Legacy-order RSA PKCS#1 v1.5 commands.

    Signatures and ciphertexts are read and printed in the legacy
    (least-significant byte first) order.
*/
#[derive(Args)]
pub struct RsaCommand {
    #[command(subcommand)]
    command: RsaSubcommand,
}

#[derive(Subcommand)]
enum RsaSubcommand {
    /// Hash a message and sign the digest.
    Sign {
        /// PRIVATEKEYBLOB file.
        #[arg(short, long)]
        key: PathBuf,

        /// Message as hex, or @file.
        #[arg(short, long)]
        message: String,

        /// Digest algorithm.
        #[arg(long, default_value = "sha256")]
        hash: HashAlgorithm,
    },
    /// Verify a signature over a message; exits non-zero if it is invalid.
    Verify {
        /// PRIVATEKEYBLOB or PUBLICKEYBLOB file.
        #[arg(short, long)]
        key: PathBuf,

        /// Message as hex, or @file.
        #[arg(short, long)]
        message: String,

        /// Signature as hex, or @file.
        #[arg(short, long)]
        signature: String,

        /// Digest algorithm.
        #[arg(long, default_value = "sha256")]
        hash: HashAlgorithm,
    },
    /// Encrypt data; prints hex ciphertext.
    Encrypt {
        /// PRIVATEKEYBLOB or PUBLICKEYBLOB file.
        #[arg(short, long)]
        key: PathBuf,

        /// Plaintext as hex, or @file.
        data: String,
    },
    /// Decrypt data; prints hex plaintext.
    Decrypt {
        /// PRIVATEKEYBLOB file.
        #[arg(short, long)]
        key: PathBuf,

        /// Ciphertext as hex, or @file.
        data: String,
    },
}

impl RsaCommand {
    pub fn run(self) -> Result<()> {
        match self.command {
            RsaSubcommand::Sign { key, message, hash } => {
                let key = load_private_key(&key)?;
                let digest = hash.digest(&read_data(&message)?);
                let signature = RsaCipher::with_hash(hash)
                    .sign(&key, &digest)
                    .context("signing failed")?;
                println!("{}", hex::encode(signature));
            }
            RsaSubcommand::Verify {
                key,
                message,
                signature,
                hash,
            } => {
                let key = load_public_key(&key)?;
                let digest = hash.digest(&read_data(&message)?);
                let signature = read_data(&signature)?;
                let valid = RsaCipher::with_hash(hash)
                    .verify(&key, &digest, &signature)
                    .context("verification failed")?;
                if !valid {
                    bail!("signature is not valid");
                }
                println!("Signature OK");
            }
            RsaSubcommand::Encrypt { key, data } => {
                let key = load_public_key(&key)?;
                let ciphertext = RsaCipher::new()
                    .encrypt(&key, &read_data(&data)?)
                    .context("RSA encryption failed")?;
                println!("{}", hex::encode(ciphertext));
            }
            RsaSubcommand::Decrypt { key, data } => {
                let key = load_private_key(&key)?;
                let plaintext = RsaCipher::new()
                    .decrypt(&key, &read_data(&data)?)
                    .context("RSA decryption failed")?;
                println!("{}", hex::encode(plaintext));
            }
        }
        Ok(())
    }
}

fn load_private_key(path: &Path) -> Result<PrivateKey> {
    match load_blob(path)? {
        KeyBlob::Private(key) => Ok(key),
        other => bail!(
            "{} is a {}, expected a private key blob",
            path.display(),
            other.blob_type()
        ),
    }
}

fn load_public_key(path: &Path) -> Result<PublicKey> {
    let blob = load_blob(path)?;
    blob.public_key().with_context(|| {
        format!(
            "{} is a {}, expected an RSA key blob",
            path.display(),
            blob.blob_type()
        )
    })
}
