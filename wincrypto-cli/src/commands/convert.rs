use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use rsa::{
    RsaPrivateKey, RsaPublicKey,
    pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey},
    pkcs8::{DecodePrivateKey, DecodePublicKey},
};

use wincrypto::{AlgorithmId, KeyBlob, PrivateKey, PublicKey};

/**
    Convert a PEM or DER RSA key into a CryptoAPI key blob.
*/
#[derive(Args)]
pub struct ConvertCommand {
    /// RSA key file (PEM or DER, PKCS#1 or PKCS#8 / SPKI).
    pub key: PathBuf,

    /// Blob algorithm: sign (CALG_RSA_SIGN) or keyx (CALG_RSA_KEYX).
    #[arg(short, long, default_value = "keyx")]
    algorithm: AlgorithmId,

    /// Emit a PUBLICKEYBLOB even if the input is a private key.
    #[arg(long)]
    public: bool,

    /// Output file path. If omitted, the blob is printed as base64.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ConvertCommand {
    pub fn run(self) -> Result<()> {
        if !self.algorithm.is_rsa() {
            bail!("{} is not an RSA algorithm", self.algorithm);
        }

        let key_data = std::fs::read(&self.key).context("failed to read key file")?;
        let blob: KeyBlob = match parse_private_key(&key_data) {
            Ok(key) => {
                let key = PrivateKey::from_rsa(key, self.algorithm)
                    .context("key cannot be stored in a blob")?;
                eprintln!("Loaded RSA private key ({} bits)", key.bit_length());
                if self.public {
                    key.public_key().into()
                } else {
                    key.into()
                }
            }
            Err(_) => {
                let key = parse_public_key(&key_data).context(
                    "failed to parse RSA key (expected PEM or DER, PKCS#1, PKCS#8 or SPKI)",
                )?;
                let key = PublicKey::from_rsa(key, self.algorithm)
                    .context("key cannot be stored in a blob")?;
                eprintln!("Loaded RSA public key ({} bits)", key.bit_length());
                key.into()
            }
        };

        let bytes = blob.to_bytes().context("failed to encode key blob")?;
        match &self.output {
            Some(path) => {
                std::fs::write(path, &bytes).context("failed to write key blob")?;
                eprintln!(
                    "Created {} ({}, {} bytes)",
                    path.display(),
                    blob.blob_type(),
                    bytes.len()
                );
            }
            None => println!("{}", data_encoding::BASE64.encode(&bytes)),
        }

        Ok(())
    }
}

/**
    Try parsing an RSA private key from various formats.
    Attempts PEM (PKCS#8, PKCS#1) then DER (PKCS#8, PKCS#1).
*/
fn parse_private_key(data: &[u8]) -> Result<RsaPrivateKey> {
    if let Ok(pem_str) = std::str::from_utf8(data) {
        if let Ok(key) = RsaPrivateKey::from_pkcs8_pem(pem_str) {
            return Ok(key);
        }
        if let Ok(key) = RsaPrivateKey::from_pkcs1_pem(pem_str) {
            return Ok(key);
        }
    }

    if let Ok(key) = RsaPrivateKey::from_pkcs8_der(data) {
        return Ok(key);
    }
    if let Ok(key) = RsaPrivateKey::from_pkcs1_der(data) {
        return Ok(key);
    }

    bail!("unrecognized private key format")
}

/**
    Same as [`parse_private_key`] for public keys (SPKI, PKCS#1).
*/
fn parse_public_key(data: &[u8]) -> Result<RsaPublicKey> {
    if let Ok(pem_str) = std::str::from_utf8(data) {
        if let Ok(key) = RsaPublicKey::from_public_key_pem(pem_str) {
            return Ok(key);
        }
        if let Ok(key) = RsaPublicKey::from_pkcs1_pem(pem_str) {
            return Ok(key);
        }
    }

    if let Ok(key) = RsaPublicKey::from_public_key_der(data) {
        return Ok(key);
    }
    if let Ok(key) = RsaPublicKey::from_pkcs1_der(data) {
        return Ok(key);
    }

    bail!("unrecognized public key format")
}
