use crate::constants::CUR_BLOB_VERSION;
use crate::error::{BlobDefect, WinCryptoError, WinCryptoResult};
use crate::reader::Reader;
use crate::types::{AlgorithmId, BlobType};

/**
    Decoded fixed-size prefix of a key blob.

    `bit_length` comes from RSAPUBKEY for RSA blobs and from the
    `dwKeySize` field (in bytes, converted to bits) for plaintext key blobs.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBlobHeader {
    pub blob_type: BlobType,
    pub version: u8,
    pub algorithm: AlgorithmId,
    pub bit_length: u32,
}

/**
    Read BLOBHEADER and check that it describes a blob of type `expected`.

    Layout:
      [0]     bType
      [1]     bVersion (must be 2)
      [2..4]  reserved
      [4..8]  aiKeyAlg (u32 LE)
*/
pub(crate) fn read_blob_header(
    r: &mut Reader<'_>,
    expected: BlobType,
) -> WinCryptoResult<AlgorithmId> {
    let blob_type = r.u8()?;
    let version = r.u8()?;
    let _reserved = r.u16_le()?;
    let alg_id = r.u32_le()?;

    if blob_type != expected.to_u8() {
        return Err(BlobDefect::BadBlobType(blob_type).into());
    }
    if version != CUR_BLOB_VERSION {
        return Err(BlobDefect::BadVersion(version).into());
    }

    AlgorithmId::from_u32(alg_id).ok_or(WinCryptoError::UnsupportedAlgorithm(alg_id))
}

/**
    Append a BLOBHEADER for `blob_type` / `algorithm` to `buffer`.
*/
pub(crate) fn write_blob_header(buffer: &mut Vec<u8>, blob_type: BlobType, algorithm: AlgorithmId) {
    buffer.push(blob_type.to_u8());
    buffer.push(CUR_BLOB_VERSION);
    buffer.extend(&0u16.to_le_bytes());
    buffer.extend(&algorithm.to_u32().to_le_bytes());
}
