/*!
    CryptoAPI key blob constants.

    Values are from `wincrypt.h`.
*/

/// `bType` of a public RSA key blob.
pub const PUBLICKEYBLOB: u8 = 0x06;
/// `bType` of a private RSA key blob.
pub const PRIVATEKEYBLOB: u8 = 0x07;
/// `bType` of an unencrypted symmetric key blob.
pub const PLAINTEXTKEYBLOB: u8 = 0x08;

/// `bVersion` written by every supported provider.
pub const CUR_BLOB_VERSION: u8 = 0x02;

pub const CALG_RSA_SIGN: u32 = 0x0000_2400;
pub const CALG_RSA_KEYX: u32 = 0x0000_A400;
pub const CALG_AES_128: u32 = 0x0000_660E;
pub const CALG_AES_192: u32 = 0x0000_660F;
pub const CALG_AES_256: u32 = 0x0000_6610;
pub const CALG_AES: u32 = 0x0000_6611;

/// `RSAPUBKEY.magic` of a public blob: "RSA1" read as a little-endian u32.
pub const RSA1_MAGIC: u32 = u32::from_le_bytes(*b"RSA1");
/// `RSAPUBKEY.magic` of a private blob: "RSA2" read as a little-endian u32.
pub const RSA2_MAGIC: u32 = u32::from_le_bytes(*b"RSA2");

/// BLOBHEADER: bType, bVersion, reserved, aiKeyAlg.
pub const BLOB_HEADER_LEN: usize = 8;
/// RSAPUBKEY: magic, bitlen, pubexp.
pub const RSA_PUBKEY_LEN: usize = 12;
/// Offset of the modulus in both RSA blob kinds.
pub const RSA_MODULUS_OFFSET: usize = BLOB_HEADER_LEN + RSA_PUBKEY_LEN;

pub const RSA_MIN_BITS: u32 = 512;
pub const RSA_MAX_BITS: u32 = 16384;

pub const AES_BLOCK_SIZE: usize = 16;
