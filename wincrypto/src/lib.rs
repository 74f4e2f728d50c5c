#![allow(clippy::doc_overindented_list_items)]

/*!
    CryptoAPI-compatible key blobs, RSA and AES.

    Parses PRIVATEKEYBLOB / PUBLICKEYBLOB / PLAINTEXTKEYBLOB containers and
    adapts the RustCrypto primitives to the legacy conventions:
    - RSA signatures and ciphertexts are byte-reversed at the boundary
    - AES-CBC output carries a random IV as its first block, PKCS#7 padded
*/

pub mod constants;

mod blob;
mod crypto;
mod error;
mod reader;
mod types;
mod utils;

pub use self::blob::{
    AesKey, KeyBlob, KeyBlobHeader, PrivateKey, PublicKey, RsaKeyMaterial, RsaPrivateComponents,
    private_blob_len, public_blob_len,
};
pub use self::crypto::{
    AesBackend, AesCipher, AesConfig, AesPadding, IvPolicy, RsaBackend, RsaCipher, RustCrypto,
    pkcs7_pad, pkcs7_unpad,
};
pub use self::error::{BlobDefect, ParseError, WinCryptoError, WinCryptoResult};
pub use self::types::{AlgorithmId, BlobType, HashAlgorithm};
pub use self::utils::reverse_bytes;

// Re-export the RSA crate so callers can build keys for `PrivateKey::from_rsa`
pub use rsa;

/**
    Parse a PRIVATEKEYBLOB into an RSA private key.
*/
pub fn import_rsa_private_key_blob(blob: &[u8]) -> WinCryptoResult<PrivateKey> {
    PrivateKey::from_blob(blob)
}

/**
    Parse a PUBLICKEYBLOB into an RSA public key.
*/
pub fn import_rsa_public_key_blob(blob: &[u8]) -> WinCryptoResult<PublicKey> {
    PublicKey::from_blob(blob)
}

/**
    Parse a PLAINTEXTKEYBLOB into an AES key.
*/
pub fn import_aes_key_blob(blob: &[u8]) -> WinCryptoResult<AesKey> {
    AesKey::from_blob(blob)
}

/**
    AES-CBC encrypt with the legacy defaults: random IV prefix, PKCS#7.

    `key` must be 16, 24 or 32 bytes.
*/
pub fn aes_encrypt(plaintext: &[u8], key: &[u8]) -> WinCryptoResult<Vec<u8>> {
    AesCipher::default().encrypt(&AesKey::new(key)?, plaintext)
}

/**
    Inverse of [`aes_encrypt`].
*/
pub fn aes_decrypt(ciphertext: &[u8], key: &[u8]) -> WinCryptoResult<Vec<u8>> {
    AesCipher::default().decrypt(&AesKey::new(key)?, ciphertext)
}

/**
    PKCS#1 v1.5 sign a SHA-256 digest, returning the signature in legacy order.
*/
pub fn rsa_sign(key: &PrivateKey, digest: &[u8]) -> WinCryptoResult<Vec<u8>> {
    RsaCipher::new().sign(key, digest)
}

/**
    Verify a legacy-order PKCS#1 v1.5 signature over a SHA-256 digest.
*/
pub fn rsa_verify(key: &PublicKey, digest: &[u8], signature: &[u8]) -> WinCryptoResult<bool> {
    RsaCipher::new().verify(key, digest, signature)
}

/**
    PKCS#1 v1.5 encrypt, returning the ciphertext in legacy order.
*/
pub fn rsa_encrypt(key: &PublicKey, plaintext: &[u8]) -> WinCryptoResult<Vec<u8>> {
    RsaCipher::new().encrypt(key, plaintext)
}

/**
    Decrypt a legacy-order PKCS#1 v1.5 ciphertext.
*/
pub fn rsa_decrypt(key: &PrivateKey, ciphertext: &[u8]) -> WinCryptoResult<Vec<u8>> {
    RsaCipher::new().decrypt(key, ciphertext)
}
