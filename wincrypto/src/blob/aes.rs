use core::fmt;

use crate::error::{BlobDefect, WinCryptoError, WinCryptoResult};
use crate::reader::Reader;
use crate::types::{AlgorithmId, BlobType};

use super::header::{KeyBlobHeader, read_blob_header, write_blob_header};
use super::rsa::decode_base64;

/**
    A raw AES key of 16, 24 or 32 bytes.

    AES key bytes are used exactly as given; unlike RSA integers they are
    never byte-reversed.
*/
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum AesKey {
    Aes128([u8; 16]),
    Aes192([u8; 24]),
    Aes256([u8; 32]),
}

impl AesKey {
    /**
        Create a key from raw bytes, selecting the variant by length.
    */
    pub fn new(key: impl AsRef<[u8]>) -> WinCryptoResult<Self> {
        let key = key.as_ref();
        if let Ok(k) = <[u8; 16]>::try_from(key) {
            Ok(Self::Aes128(k))
        } else if let Ok(k) = <[u8; 24]>::try_from(key) {
            Ok(Self::Aes192(k))
        } else if let Ok(k) = <[u8; 32]>::try_from(key) {
            Ok(Self::Aes256(k))
        } else {
            Err(WinCryptoError::InvalidKeyLength(key.len()))
        }
    }

    /**
        Parse a PLAINTEXTKEYBLOB.

        Layout:
          [0..8]    BLOBHEADER (bType = 0x08, aiKeyAlg = CALG_AES_*)
          [8..12]   dwKeySize (u32 LE, in bytes)
          [12..]    key bytes
    */
    pub fn from_blob(data: impl AsRef<[u8]>) -> WinCryptoResult<Self> {
        let data = data.as_ref();
        Self::parse(data).inspect_err(|e| {
            tracing::debug!(error = %e, len = data.len(), "rejected plaintext key blob");
        })
    }

    fn parse(data: &[u8]) -> WinCryptoResult<Self> {
        let mut r = Reader::new(data);
        let algorithm = read_blob_header(&mut r, BlobType::PlainTextKey)?;
        if !algorithm.is_aes() {
            return Err(WinCryptoError::UnsupportedAlgorithm(algorithm.to_u32()));
        }

        let key_size = r.u32_le()?;
        let bits = key_size.saturating_mul(8);
        if !algorithm.supports_bits(bits) {
            return Err(WinCryptoError::UnsupportedKeySize { algorithm, bits });
        }

        let expected = r.position() + key_size as usize;
        if data.len() < expected {
            return Err(BlobDefect::Truncated {
                expected,
                actual: data.len(),
            }
            .into());
        }
        let key = r.bytes(key_size as usize)?;
        r.finish()?;

        Self::new(key)
    }

    /**
        Parse a base64-encoded PLAINTEXTKEYBLOB.
    */
    pub fn from_base64(blob: impl AsRef<[u8]>) -> WinCryptoResult<Self> {
        Self::from_blob(decode_base64(blob.as_ref())?)
    }

    /**
        Serialize into PLAINTEXTKEYBLOB bytes, tagged with the size-specific
        CALG_AES_* identifier.
    */
    pub fn to_blob(&self) -> Vec<u8> {
        let key = self.as_bytes();
        let mut buffer = Vec::with_capacity(12 + key.len());
        write_blob_header(&mut buffer, BlobType::PlainTextKey, self.algorithm());
        buffer.extend(&(key.len() as u32).to_le_bytes());
        buffer.extend(key);
        buffer
    }

    pub fn header(&self) -> KeyBlobHeader {
        KeyBlobHeader {
            blob_type: BlobType::PlainTextKey,
            version: crate::constants::CUR_BLOB_VERSION,
            algorithm: self.algorithm(),
            bit_length: self.bit_length(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Aes128(k) => k,
            Self::Aes192(k) => k,
            Self::Aes256(k) => k,
        }
    }

    pub fn algorithm(&self) -> AlgorithmId {
        match self {
            Self::Aes128(_) => AlgorithmId::Aes128,
            Self::Aes192(_) => AlgorithmId::Aes192,
            Self::Aes256(_) => AlgorithmId::Aes256,
        }
    }

    pub fn bit_length(&self) -> u32 {
        self.as_bytes().len() as u32 * 8
    }
}

impl TryFrom<&[u8]> for AesKey {
    type Error = WinCryptoError;

    fn try_from(key: &[u8]) -> Result<Self, Self::Error> {
        Self::new(key)
    }
}

impl fmt::Debug for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesKey")
            .field("algorithm", &self.algorithm())
            .finish_non_exhaustive()
    }
}
