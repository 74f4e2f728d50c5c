use rand::RngCore;

use crate::blob::AesKey;
use crate::constants::AES_BLOCK_SIZE;
use crate::error::{WinCryptoError, WinCryptoResult};

use super::backend::{AesBackend, RustCrypto};
use super::padding::{pkcs7_pad, pkcs7_unpad};

/**
    Where the CBC initialization vector comes from.
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IvPolicy {
    /// Fresh random IV per message, written as the first block of the output.
    #[default]
    RandomPrefixed,
    /// The same IV for every message; it is not transmitted.
    Fixed([u8; AES_BLOCK_SIZE]),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AesPadding {
    #[default]
    Pkcs7,
    /// Input must already be a multiple of the block size.
    None,
}

/**
    Fixed AES-CBC parameterization of an [`AesCipher`].

    The default matches the legacy platform: random IV prefix and PKCS#7.
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AesConfig {
    pub iv: IvPolicy,
    pub padding: AesPadding,
}

impl AesConfig {
    pub const fn new(iv: IvPolicy, padding: AesPadding) -> Self {
        Self { iv, padding }
    }

    const fn iv_prefix_len(&self) -> usize {
        match self.iv {
            IvPolicy::RandomPrefixed => AES_BLOCK_SIZE,
            IvPolicy::Fixed(_) => 0,
        }
    }
}

/**
    AES-CBC with the legacy IV and padding conventions.

    AES data is never byte-reversed. Output layout for the default config:
      [0..16]   IV
      [16..]    CBC(PKCS#7(plaintext))
*/
#[derive(Debug, Clone)]
pub struct AesCipher<B = RustCrypto> {
    config: AesConfig,
    backend: B,
}

impl AesCipher {
    pub fn new(config: AesConfig) -> Self {
        Self {
            config,
            backend: RustCrypto,
        }
    }
}

impl Default for AesCipher {
    fn default() -> Self {
        Self::new(AesConfig::default())
    }
}

impl<B: AesBackend> AesCipher<B> {
    pub fn with_backend(config: AesConfig, backend: B) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &AesConfig {
        &self.config
    }

    /**
        Encrypt `plaintext`, drawing a fresh IV from the OS RNG when the
        policy calls for one.
    */
    pub fn encrypt(&self, key: &AesKey, plaintext: &[u8]) -> WinCryptoResult<Vec<u8>> {
        let iv = match self.config.iv {
            IvPolicy::RandomPrefixed => {
                let mut iv = [0u8; AES_BLOCK_SIZE];
                rand::rng().fill_bytes(&mut iv);
                iv
            }
            IvPolicy::Fixed(iv) => iv,
        };
        self.encrypt_with_iv(key, &iv, plaintext)
    }

    /**
        Encrypt with an explicit IV.

        The IV overrides the policy's source but not its framing: it is
        still written as the first block under [`IvPolicy::RandomPrefixed`].
    */
    pub fn encrypt_with_iv(
        &self,
        key: &AesKey,
        iv: &[u8; AES_BLOCK_SIZE],
        plaintext: &[u8],
    ) -> WinCryptoResult<Vec<u8>> {
        let mut body = match self.config.padding {
            AesPadding::Pkcs7 => pkcs7_pad(plaintext, AES_BLOCK_SIZE),
            AesPadding::None => {
                if !plaintext.len().is_multiple_of(AES_BLOCK_SIZE) {
                    return Err(WinCryptoError::InvalidInputLength(
                        plaintext.len(),
                        "unpadded plaintext must be a multiple of 16 bytes",
                    ));
                }
                plaintext.to_vec()
            }
        };
        self.backend.cbc_encrypt(key, iv, &mut body)?;

        let mut out = Vec::with_capacity(self.config.iv_prefix_len() + body.len());
        if let IvPolicy::RandomPrefixed = self.config.iv {
            out.extend_from_slice(iv);
        }
        out.extend_from_slice(&body);

        tracing::debug!(
            algorithm = %key.algorithm(),
            len = plaintext.len(),
            out = out.len(),
            "AES encrypt"
        );
        Ok(out)
    }

    pub fn decrypt(&self, key: &AesKey, ciphertext: &[u8]) -> WinCryptoResult<Vec<u8>> {
        let prefix = self.config.iv_prefix_len();
        let min_len = match self.config.padding {
            AesPadding::Pkcs7 => prefix + AES_BLOCK_SIZE,
            AesPadding::None => prefix,
        };
        if ciphertext.len() < min_len {
            return Err(WinCryptoError::InvalidInputLength(
                ciphertext.len(),
                "ciphertext is too short",
            ));
        }
        if !ciphertext.len().is_multiple_of(AES_BLOCK_SIZE) {
            return Err(WinCryptoError::InvalidInputLength(
                ciphertext.len(),
                "ciphertext must be a multiple of 16 bytes",
            ));
        }

        let (iv, body) = match self.config.iv {
            IvPolicy::RandomPrefixed => {
                let (head, body) = ciphertext.split_at(AES_BLOCK_SIZE);
                let mut iv = [0u8; AES_BLOCK_SIZE];
                iv.copy_from_slice(head);
                (iv, body)
            }
            IvPolicy::Fixed(iv) => (iv, ciphertext),
        };

        let mut buffer = body.to_vec();
        self.backend.cbc_decrypt(key, &iv, &mut buffer)?;

        match self.config.padding {
            AesPadding::Pkcs7 => pkcs7_unpad(&buffer, AES_BLOCK_SIZE).inspect_err(|e| {
                tracing::debug!(error = %e, algorithm = %key.algorithm(), "AES decrypt failed");
            }),
            AesPadding::None => Ok(buffer),
        }
    }
}
