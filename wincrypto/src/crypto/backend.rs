use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::{
    BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit, block_padding::NoPadding,
};
use rsa::{Pkcs1v15Encrypt, Pkcs1v15Sign};
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};

use crate::blob::{AesKey, PrivateKey, PublicKey};
use crate::constants::AES_BLOCK_SIZE;
use crate::error::{WinCryptoError, WinCryptoResult};
use crate::types::HashAlgorithm;

/**
    Standard-order RSA primitives.

    Implementations see big-endian signatures and ciphertexts only; the
    adapter owns every byte reversal.
*/
pub trait RsaBackend {
    /**
        PKCS#1 v1.5 signature over a precomputed `digest` of type `hash`.
    */
    fn sign_pkcs1v15(
        &self,
        key: &PrivateKey,
        hash: HashAlgorithm,
        digest: &[u8],
    ) -> WinCryptoResult<Vec<u8>>;

    /**
        Returns `Ok(false)` for a signature that does not verify.
    */
    fn verify_pkcs1v15(
        &self,
        key: &PublicKey,
        hash: HashAlgorithm,
        digest: &[u8],
        signature: &[u8],
    ) -> WinCryptoResult<bool>;

    fn encrypt_pkcs1v15(&self, key: &PublicKey, plaintext: &[u8]) -> WinCryptoResult<Vec<u8>>;

    fn decrypt_pkcs1v15(&self, key: &PrivateKey, ciphertext: &[u8]) -> WinCryptoResult<Vec<u8>>;
}

/**
    Raw AES-CBC over block-aligned buffers, in place.

    Padding and IV framing are handled by the adapter.
*/
pub trait AesBackend {
    fn cbc_encrypt(
        &self,
        key: &AesKey,
        iv: &[u8; AES_BLOCK_SIZE],
        buffer: &mut [u8],
    ) -> WinCryptoResult<()>;

    fn cbc_decrypt(
        &self,
        key: &AesKey,
        iv: &[u8; AES_BLOCK_SIZE],
        buffer: &mut [u8],
    ) -> WinCryptoResult<()>;
}

/**
    Default backend built on the RustCrypto `rsa`, `aes` and `cbc` crates.
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RustCrypto;

fn pkcs1v15_scheme(hash: HashAlgorithm) -> Pkcs1v15Sign {
    match hash {
        HashAlgorithm::Sha1 => Pkcs1v15Sign::new::<Sha1>(),
        HashAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        HashAlgorithm::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
        HashAlgorithm::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
    }
}

impl RsaBackend for RustCrypto {
    fn sign_pkcs1v15(
        &self,
        key: &PrivateKey,
        hash: HashAlgorithm,
        digest: &[u8],
    ) -> WinCryptoResult<Vec<u8>> {
        Ok(key.rsa_key().sign(pkcs1v15_scheme(hash), digest)?)
    }

    fn verify_pkcs1v15(
        &self,
        key: &PublicKey,
        hash: HashAlgorithm,
        digest: &[u8],
        signature: &[u8],
    ) -> WinCryptoResult<bool> {
        match key.rsa_key().verify(pkcs1v15_scheme(hash), digest, signature) {
            Ok(()) => Ok(true),
            Err(rsa::Error::Verification) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn encrypt_pkcs1v15(&self, key: &PublicKey, plaintext: &[u8]) -> WinCryptoResult<Vec<u8>> {
        let mut rng = rsa::rand_core::OsRng;
        Ok(key.rsa_key().encrypt(&mut rng, Pkcs1v15Encrypt, plaintext)?)
    }

    fn decrypt_pkcs1v15(&self, key: &PrivateKey, ciphertext: &[u8]) -> WinCryptoResult<Vec<u8>> {
        Ok(key.rsa_key().decrypt(Pkcs1v15Encrypt, ciphertext)?)
    }
}

impl AesBackend for RustCrypto {
    fn cbc_encrypt(
        &self,
        key: &AesKey,
        iv: &[u8; AES_BLOCK_SIZE],
        buffer: &mut [u8],
    ) -> WinCryptoResult<()> {
        match key {
            AesKey::Aes128(k) => cbc_encrypt_with::<Aes128>(k, iv, buffer),
            AesKey::Aes192(k) => cbc_encrypt_with::<Aes192>(k, iv, buffer),
            AesKey::Aes256(k) => cbc_encrypt_with::<Aes256>(k, iv, buffer),
        }
    }

    fn cbc_decrypt(
        &self,
        key: &AesKey,
        iv: &[u8; AES_BLOCK_SIZE],
        buffer: &mut [u8],
    ) -> WinCryptoResult<()> {
        match key {
            AesKey::Aes128(k) => cbc_decrypt_with::<Aes128>(k, iv, buffer),
            AesKey::Aes192(k) => cbc_decrypt_with::<Aes192>(k, iv, buffer),
            AesKey::Aes256(k) => cbc_decrypt_with::<Aes256>(k, iv, buffer),
        }
    }
}

fn cbc_encrypt_with<C>(key: &[u8], iv: &[u8], buffer: &mut [u8]) -> WinCryptoResult<()>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    let len = buffer.len();
    cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| WinCryptoError::CryptoOperationFailed(e.to_string()))?
        .encrypt_padded_mut::<NoPadding>(buffer, len)
        .map_err(|_| WinCryptoError::InvalidInputLength(len, "not a multiple of 16 bytes"))?;
    Ok(())
}

fn cbc_decrypt_with<C>(key: &[u8], iv: &[u8], buffer: &mut [u8]) -> WinCryptoResult<()>
where
    C: BlockDecryptMut + BlockCipher + KeyInit,
{
    let len = buffer.len();
    cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| WinCryptoError::CryptoOperationFailed(e.to_string()))?
        .decrypt_padded_mut::<NoPadding>(buffer)
        .map_err(|_| WinCryptoError::InvalidInputLength(len, "not a multiple of 16 bytes"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn cbc_known_answer() {
        // NIST SP 800-38A F.2.1, CBC-AES128.Encrypt, first block
        let key = AesKey::new(hex!("2b7e151628aed2a6abf7158809cf4f3c")).unwrap();
        let iv = hex!("000102030405060708090a0b0c0d0e0f");
        let mut buffer = hex!("6bc1bee22e409f96e93d7e117393172a");
        RustCrypto.cbc_encrypt(&key, &iv, &mut buffer).unwrap();
        assert_eq!(buffer, hex!("7649abac8119b246cee98e9b12e9197d"));

        RustCrypto.cbc_decrypt(&key, &iv, &mut buffer).unwrap();
        assert_eq!(buffer, hex!("6bc1bee22e409f96e93d7e117393172a"));
    }

    #[test]
    fn cbc_rejects_partial_block() {
        let key = AesKey::new([0u8; 16]).unwrap();
        let mut buffer = [0u8; 20];
        let err = RustCrypto.cbc_encrypt(&key, &[0u8; 16], &mut buffer).unwrap_err();
        assert!(matches!(err, WinCryptoError::InvalidInputLength(20, _)));
    }

    #[test]
    fn bad_signature_is_false_not_error() {
        let key = PrivateKey::from_blob(include_bytes!("../../testfiles/privatekey.sign")).unwrap();
        let digest = HashAlgorithm::Sha256.digest(b"message");
        let ok = RustCrypto
            .verify_pkcs1v15(&key.public_key(), HashAlgorithm::Sha256, &digest, &[0u8; 256])
            .unwrap();
        assert!(!ok);
    }
}
