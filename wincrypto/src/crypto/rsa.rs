use crate::blob::{PrivateKey, PublicKey};
use crate::error::{WinCryptoError, WinCryptoResult};
use crate::types::HashAlgorithm;
use crate::utils::reverse_bytes;

use super::backend::{RsaBackend, RustCrypto};

/**
    RSA PKCS#1 v1.5 in the legacy byte order.

    Signatures and ciphertexts cross this boundary least-significant byte
    first: outputs of the backend are reversed once before they are
    returned, and inputs are reversed once before they reach the backend.
    Digests and plaintexts pass through untouched.
*/
#[derive(Debug, Clone)]
pub struct RsaCipher<B = RustCrypto> {
    hash: HashAlgorithm,
    backend: B,
}

impl RsaCipher {
    /**
        Adapter using SHA-256 digests and the default backend.
    */
    pub fn new() -> Self {
        Self::with_hash(HashAlgorithm::default())
    }

    pub fn with_hash(hash: HashAlgorithm) -> Self {
        Self {
            hash,
            backend: RustCrypto,
        }
    }
}

impl Default for RsaCipher {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: RsaBackend> RsaCipher<B> {
    pub fn with_backend(hash: HashAlgorithm, backend: B) -> Self {
        Self { hash, backend }
    }

    pub fn hash(&self) -> HashAlgorithm {
        self.hash
    }

    /**
        Sign a precomputed digest and return the signature in legacy order.
    */
    pub fn sign(&self, key: &PrivateKey, digest: &[u8]) -> WinCryptoResult<Vec<u8>> {
        self.check_digest(digest)?;
        let signature = self.backend.sign_pkcs1v15(key, self.hash, digest)?;
        tracing::debug!(hash = %self.hash, bits = key.bit_length(), "signed digest");
        Ok(reverse_bytes(&signature))
    }

    /**
        Verify a legacy-order signature over a precomputed digest.

        A signature that does not verify, including one of the wrong
        length, yields `Ok(false)`.
    */
    pub fn verify(
        &self,
        key: &PublicKey,
        digest: &[u8],
        signature: &[u8],
    ) -> WinCryptoResult<bool> {
        self.check_digest(digest)?;
        let valid = self
            .backend
            .verify_pkcs1v15(key, self.hash, digest, &reverse_bytes(signature))?;
        tracing::debug!(hash = %self.hash, valid, "verified signature");
        Ok(valid)
    }

    /**
        Encrypt `plaintext` and return the ciphertext in legacy order.
    */
    pub fn encrypt(&self, key: &PublicKey, plaintext: &[u8]) -> WinCryptoResult<Vec<u8>> {
        let ciphertext = self.backend.encrypt_pkcs1v15(key, plaintext)?;
        Ok(reverse_bytes(&ciphertext))
    }

    /**
        Decrypt a legacy-order ciphertext. The ciphertext must be exactly
        the modulus size.
    */
    pub fn decrypt(&self, key: &PrivateKey, ciphertext: &[u8]) -> WinCryptoResult<Vec<u8>> {
        if ciphertext.len() != key.size() {
            return Err(WinCryptoError::InvalidInputLength(
                ciphertext.len(),
                "ciphertext must be the size of the modulus",
            ));
        }
        self.backend.decrypt_pkcs1v15(key, &reverse_bytes(ciphertext))
    }

    fn check_digest(&self, digest: &[u8]) -> WinCryptoResult<()> {
        if digest.len() != self.hash.digest_len() {
            return Err(WinCryptoError::InvalidInputLength(
                digest.len(),
                "digest length does not match the hash algorithm",
            ));
        }
        Ok(())
    }
}
