use core::fmt;
use core::str::FromStr;

use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::constants::*;
use crate::error::ParseError;

/// Blob type as encoded in BLOBHEADER byte offset 0.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlobType {
    PublicKey = PUBLICKEYBLOB,
    PrivateKey = PRIVATEKEYBLOB,
    PlainTextKey = PLAINTEXTKEYBLOB,
}

impl BlobType {
    pub const fn from_u8(u: u8) -> Option<Self> {
        match u {
            PUBLICKEYBLOB => Some(Self::PublicKey),
            PRIVATEKEYBLOB => Some(Self::PrivateKey),
            PLAINTEXTKEYBLOB => Some(Self::PlainTextKey),
            _ => None,
        }
    }

    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    pub const fn to_name(self) -> &'static str {
        match self {
            Self::PublicKey => "PUBLICKEYBLOB",
            Self::PrivateKey => "PRIVATEKEYBLOB",
            Self::PlainTextKey => "PLAINTEXTKEYBLOB",
        }
    }
}

impl fmt::Display for BlobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

/**
    Key algorithm as encoded in BLOBHEADER.aiKeyAlg (byte offset 4, u32 LE).

    The two RSA identifiers describe the same key material; CryptoAPI only
    uses them to decide which key slot of a container the key belongs to.
*/
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AlgorithmId {
    RsaSign = CALG_RSA_SIGN,
    RsaKeyx = CALG_RSA_KEYX,
    Aes128 = CALG_AES_128,
    Aes192 = CALG_AES_192,
    Aes256 = CALG_AES_256,
    Aes = CALG_AES,
}

impl AlgorithmId {
    pub const fn from_u32(u: u32) -> Option<Self> {
        match u {
            CALG_RSA_SIGN => Some(Self::RsaSign),
            CALG_RSA_KEYX => Some(Self::RsaKeyx),
            CALG_AES_128 => Some(Self::Aes128),
            CALG_AES_192 => Some(Self::Aes192),
            CALG_AES_256 => Some(Self::Aes256),
            CALG_AES => Some(Self::Aes),
            _ => None,
        }
    }

    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    /**
        AES identifier for a raw key of the given byte length.
    */
    pub const fn for_aes_key_len(len: usize) -> Option<Self> {
        match len {
            16 => Some(Self::Aes128),
            24 => Some(Self::Aes192),
            32 => Some(Self::Aes256),
            _ => None,
        }
    }

    pub const fn is_rsa(self) -> bool {
        matches!(self, Self::RsaSign | Self::RsaKeyx)
    }

    pub const fn is_aes(self) -> bool {
        !self.is_rsa()
    }

    /**
        Returns `true` if a key of `bits` bits is valid for this algorithm.

        RSA moduli must be a whole number of bytes between 512 and 16384 bits.
        The size-specific AES identifiers pin a single size; the generic
        `CALG_AES` accepts all three.
    */
    pub const fn supports_bits(self, bits: u32) -> bool {
        match self {
            Self::RsaSign | Self::RsaKeyx => {
                bits % 8 == 0 && bits >= RSA_MIN_BITS && bits <= RSA_MAX_BITS
            }
            Self::Aes128 => bits == 128,
            Self::Aes192 => bits == 192,
            Self::Aes256 => bits == 256,
            Self::Aes => matches!(bits, 128 | 192 | 256),
        }
    }

    pub const fn to_name(self) -> &'static str {
        match self {
            Self::RsaSign => "CALG_RSA_SIGN",
            Self::RsaKeyx => "CALG_RSA_KEYX",
            Self::Aes128 => "CALG_AES_128",
            Self::Aes192 => "CALG_AES_192",
            Self::Aes256 => "CALG_AES_256",
            Self::Aes => "CALG_AES",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        match name.strip_prefix("calg_").unwrap_or(&name) {
            "rsa_sign" | "sign" => Some(Self::RsaSign),
            "rsa_keyx" | "keyx" => Some(Self::RsaKeyx),
            "aes_128" | "aes128" => Some(Self::Aes128),
            "aes_192" | "aes192" => Some(Self::Aes192),
            "aes_256" | "aes256" => Some(Self::Aes256),
            "aes" => Some(Self::Aes),
            _ => None,
        }
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

impl FromStr for AlgorithmId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ParseError {
            kind: "algorithm",
            value: s.to_owned(),
        })
    }
}

/**
    Digest algorithm named in the PKCS#1 v1.5 DigestInfo of a signature.
*/
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HashAlgorithm {
    Sha1,
    /// CALG_SHA_256, used by the legacy platform for all its signatures.
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// Length in bytes of a digest produced by this algorithm.
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Hash `data` with this algorithm.
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha1 => Sha1::digest(data).to_vec(),
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha384 => Sha384::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
        }
    }

    pub const fn to_name(self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha384 => "SHA384",
            Self::Sha512 => "SHA512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "");
        [Self::Sha1, Self::Sha256, Self::Sha384, Self::Sha512]
            .into_iter()
            .find(|h| h.to_name().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| ParseError {
                kind: "hash algorithm",
                value: s.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_ids_round_trip() {
        for alg in [
            AlgorithmId::RsaSign,
            AlgorithmId::RsaKeyx,
            AlgorithmId::Aes128,
            AlgorithmId::Aes192,
            AlgorithmId::Aes256,
            AlgorithmId::Aes,
        ] {
            assert_eq!(AlgorithmId::from_u32(alg.to_u32()), Some(alg));
            assert_eq!(alg.to_name().parse::<AlgorithmId>().unwrap(), alg);
        }
        assert_eq!(AlgorithmId::from_u32(0x6801), None); // CALG_RC4
    }

    #[test]
    fn algorithm_short_names() {
        assert_eq!("sign".parse::<AlgorithmId>().unwrap(), AlgorithmId::RsaSign);
        assert_eq!("KEYX".parse::<AlgorithmId>().unwrap(), AlgorithmId::RsaKeyx);
        assert_eq!("aes256".parse::<AlgorithmId>().unwrap(), AlgorithmId::Aes256);
        let err = "des".parse::<AlgorithmId>().unwrap_err();
        assert_eq!(err.kind, "algorithm");
    }

    #[test]
    fn rsa_bit_lengths() {
        let alg = AlgorithmId::RsaSign;
        assert!(alg.supports_bits(512));
        assert!(alg.supports_bits(1032));
        assert!(alg.supports_bits(2048));
        assert!(alg.supports_bits(16384));
        assert!(!alg.supports_bits(0));
        assert!(!alg.supports_bits(504));
        assert!(!alg.supports_bits(2047));
        assert!(!alg.supports_bits(16392));
    }

    #[test]
    fn aes_bit_lengths() {
        assert!(AlgorithmId::Aes128.supports_bits(128));
        assert!(!AlgorithmId::Aes128.supports_bits(256));
        assert!(AlgorithmId::Aes.supports_bits(192));
        assert!(!AlgorithmId::Aes.supports_bits(64));
    }

    #[test]
    fn blob_type_bytes() {
        assert_eq!(BlobType::from_u8(0x07), Some(BlobType::PrivateKey));
        assert_eq!(BlobType::from_u8(0x06), Some(BlobType::PublicKey));
        assert_eq!(BlobType::from_u8(0x08), Some(BlobType::PlainTextKey));
        assert_eq!(BlobType::from_u8(0x01), None); // SIMPLEBLOB
    }

    #[test]
    fn hash_names_and_lengths() {
        assert_eq!("sha-256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("SHA1".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha1);
        assert!("md5".parse::<HashAlgorithm>().is_err());
        for h in [
            HashAlgorithm::Sha1,
            HashAlgorithm::Sha256,
            HashAlgorithm::Sha384,
            HashAlgorithm::Sha512,
        ] {
            assert_eq!(h.digest(b"abc").len(), h.digest_len());
        }
    }
}
