use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use wincrypto::KeyBlob;

use super::load_blob;

/**
    Inspect a key blob file.
*/
#[derive(Args)]
pub struct InspectCommand {
    /// Key blob file (raw bytes or base64).
    pub path: PathBuf,
}

impl InspectCommand {
    pub fn run(self) -> Result<()> {
        let blob = load_blob(&self.path)?;
        let header = blob.header();

        println!("Blob Type:    {}", header.blob_type);
        println!("Version:      {}", header.version);
        println!("Algorithm:    {}", header.algorithm);
        println!("Bit Length:   {}", header.bit_length);

        if let Some(public) = blob.public_key() {
            println!("Exponent:     {}", public.public_exponent());
            println!("Fingerprint:  {}", public.fingerprint());
            println!("Blob Size:    {} bytes", blob.to_bytes()?.len());
        }

        if let KeyBlob::Private(key) = &blob {
            println!();
            println!("Private key components present (CRT parameters verified)");
            println!("Public Blob:  {}", key.public_key().to_base64()?);
        }

        Ok(())
    }
}
