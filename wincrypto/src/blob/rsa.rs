/*!
    RSA key blobs (PUBLICKEYBLOB / PRIVATEKEYBLOB).

    Layout, all integers little-endian:
      [0..8]    BLOBHEADER
      [8..12]   RSAPUBKEY.magic   "RSA1" (public) or "RSA2" (private)
      [12..16]  RSAPUBKEY.bitlen
      [16..20]  RSAPUBKEY.pubexp
      [20..]    modulus           bitlen/8 bytes
    Private blobs continue with:
                prime1 (P)        bitlen/16 bytes
                prime2 (Q)        bitlen/16 bytes
                exponent1 (dP)    bitlen/16 bytes
                exponent2 (dQ)    bitlen/16 bytes
                coefficient       bitlen/16 bytes
                privateExponent   bitlen/8 bytes

    Every big integer is stored least-significant byte first and is
    reversed exactly once on the way in and once on the way out.
*/

use core::cmp::Ordering;
use core::fmt;

use rsa::{
    BigUint, RsaPrivateKey, RsaPublicKey,
    traits::{PrivateKeyParts, PublicKeyParts},
};

use crate::constants::{RSA_MAX_BITS, RSA_MODULUS_OFFSET, RSA1_MAGIC, RSA2_MAGIC};
use crate::error::{BlobDefect, WinCryptoError, WinCryptoResult};
use crate::reader::Reader;
use crate::types::{AlgorithmId, BlobType, HashAlgorithm};
use crate::utils::{uint_from_reversed, uint_to_reversed};

use super::header::{KeyBlobHeader, read_blob_header, write_blob_header};

/// Byte width of the modulus and private exponent fields.
const fn full_len(bits: u32) -> usize {
    bits.div_ceil(8) as usize
}

/// Byte width of each CRT field.
const fn half_len(bits: u32) -> usize {
    bits.div_ceil(16) as usize
}

/**
    Exact length of a PRIVATEKEYBLOB for a key of `bits` bits.
*/
pub const fn private_blob_len(bits: u32) -> usize {
    RSA_MODULUS_OFFSET + 2 * full_len(bits) + 5 * half_len(bits)
}

/**
    Exact length of a PUBLICKEYBLOB for a key of `bits` bits.
*/
pub const fn public_blob_len(bits: u32) -> usize {
    RSA_MODULUS_OFFSET + full_len(bits)
}

/**
    RSA key material decoded from a blob, in canonical (big-endian) form.

    `private` is `None` for public keys. The public half of any key is the
    projection `{ modulus, public_exponent }`, see [`Self::public_projection`].
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaKeyMaterial {
    /// RSAPUBKEY.bitlen
    pub bit_length: u32,
    pub modulus: BigUint,
    pub public_exponent: u32,
    pub private: Option<RsaPrivateComponents>,
}

impl RsaKeyMaterial {
    pub fn public_projection(&self) -> Self {
        Self {
            bit_length: self.bit_length,
            modulus: self.modulus.clone(),
            public_exponent: self.public_exponent,
            private: None,
        }
    }

    pub fn is_private(&self) -> bool {
        self.private.is_some()
    }
}

/**
    Private exponent and CRT parameters of an RSA key.
*/
#[derive(Clone, PartialEq, Eq)]
pub struct RsaPrivateComponents {
    pub private_exponent: BigUint,
    pub prime_p: BigUint,
    pub prime_q: BigUint,
    /// D mod (P - 1)
    pub d_mod_p1: BigUint,
    /// D mod (Q - 1)
    pub d_mod_q1: BigUint,
    /// Q^-1 mod P
    pub coefficient: BigUint,
}

impl fmt::Debug for RsaPrivateComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateComponents").finish_non_exhaustive()
    }
}

impl RsaPrivateComponents {
    /**
        Derive the CRT parameters from the two primes and the private exponent.
    */
    fn derive(
        private_exponent: BigUint,
        prime_p: BigUint,
        prime_q: BigUint,
    ) -> Result<Self, BlobDefect> {
        let one = BigUint::from(1u32);
        let two = BigUint::from(2u32);
        if prime_p <= two || prime_q <= two {
            return Err(BlobDefect::InconsistentKey("prime factor is too small".into()));
        }
        let d_mod_p1 = &private_exponent % &(&prime_p - &one);
        let d_mod_q1 = &private_exponent % &(&prime_q - &one);
        // P is prime, so Q^(P-2) mod P is the inverse of Q
        let coefficient = prime_q.modpow(&(&prime_p - &two), &prime_p);
        Ok(Self {
            private_exponent,
            prime_p,
            prime_q,
            d_mod_p1,
            d_mod_q1,
            coefficient,
        })
    }

    /**
        Check the stored CRT parameters against the primes, the modulus and D.
    */
    fn check(&self, modulus: &BigUint) -> Result<(), BlobDefect> {
        let one = BigUint::from(1u32);
        if self.prime_p <= one || self.prime_q <= one {
            return Err(BlobDefect::InconsistentKey("prime factor is trivial".into()));
        }
        if &(&self.prime_p * &self.prime_q) != modulus {
            return Err(BlobDefect::InconsistentKey("P * Q does not equal the modulus".into()));
        }
        if &self.private_exponent % &(&self.prime_p - &one) != self.d_mod_p1 {
            return Err(BlobDefect::InconsistentKey("dP does not equal D mod (P - 1)".into()));
        }
        if &self.private_exponent % &(&self.prime_q - &one) != self.d_mod_q1 {
            return Err(BlobDefect::InconsistentKey("dQ does not equal D mod (Q - 1)".into()));
        }
        if (&self.coefficient * &self.prime_q) % &self.prime_p != one {
            return Err(BlobDefect::InconsistentKey("coefficient is not Q^-1 mod P".into()));
        }
        Ok(())
    }
}

/**
    An RSA public key, imported from a PUBLICKEYBLOB or projected from a [`PrivateKey`].
*/
#[derive(Clone)]
pub struct PublicKey {
    algorithm: AlgorithmId,
    bit_length: u32,
    modulus: BigUint,
    public_exponent: u32,
    key: RsaPublicKey,
}

impl PublicKey {
    fn new(
        algorithm: AlgorithmId,
        bit_length: u32,
        modulus: BigUint,
        public_exponent: u32,
    ) -> WinCryptoResult<Self> {
        let key = RsaPublicKey::new_with_max_size(
            modulus.clone(),
            BigUint::from(public_exponent),
            RSA_MAX_BITS as usize,
        )
        .map_err(|e| BlobDefect::InconsistentKey(e.to_string()))?;
        Ok(Self {
            algorithm,
            bit_length,
            modulus,
            public_exponent,
            key,
        })
    }

    /**
        Parse a PUBLICKEYBLOB.
    */
    pub fn from_blob(data: impl AsRef<[u8]>) -> WinCryptoResult<Self> {
        let data = data.as_ref();
        Self::parse(data)
            .inspect(|key| {
                tracing::debug!(
                    algorithm = %key.algorithm,
                    bits = key.bit_length,
                    "imported RSA public key blob"
                );
            })
            .inspect_err(|e| {
                tracing::debug!(error = %e, len = data.len(), "rejected RSA public key blob");
            })
    }

    fn parse(data: &[u8]) -> WinCryptoResult<Self> {
        let mut r = Reader::new(data);
        let (algorithm, bits, public_exponent) =
            read_rsa_prefix(&mut r, BlobType::PublicKey, RSA1_MAGIC)?;
        check_exact_len(data.len(), public_blob_len(bits))?;

        let modulus = uint_from_reversed(r.bytes(full_len(bits))?);
        r.finish()?;

        Self::new(algorithm, bits, modulus, public_exponent)
    }

    /**
        Parse a base64-encoded PUBLICKEYBLOB.
    */
    pub fn from_base64(blob: impl AsRef<[u8]>) -> WinCryptoResult<Self> {
        Self::from_blob(decode_base64(blob.as_ref())?)
    }

    /**
        Wrap a public key obtained elsewhere (e.g. PKCS#1 / SPKI) for blob export.
    */
    pub fn from_rsa(key: RsaPublicKey, algorithm: AlgorithmId) -> WinCryptoResult<Self> {
        let bit_length = checked_bit_length(key.size(), algorithm)?;
        let public_exponent = exponent_to_u32(key.e())?;
        Ok(Self {
            algorithm,
            bit_length,
            modulus: key.n().clone(),
            public_exponent,
            key,
        })
    }

    /**
        Serialize into PUBLICKEYBLOB bytes.
    */
    pub fn to_blob(&self) -> WinCryptoResult<Vec<u8>> {
        let mut buffer = Vec::with_capacity(public_blob_len(self.bit_length));
        write_rsa_prefix(
            &mut buffer,
            BlobType::PublicKey,
            self.algorithm,
            RSA1_MAGIC,
            self.bit_length,
            self.public_exponent,
        );
        write_field(&mut buffer, "modulus", &self.modulus, full_len(self.bit_length))?;
        Ok(buffer)
    }

    /**
        Serialize to a base64-encoded PUBLICKEYBLOB.
    */
    pub fn to_base64(&self) -> WinCryptoResult<String> {
        self.to_blob().map(|b| data_encoding::BASE64.encode(&b))
    }

    pub fn header(&self) -> KeyBlobHeader {
        KeyBlobHeader {
            blob_type: BlobType::PublicKey,
            version: crate::constants::CUR_BLOB_VERSION,
            algorithm: self.algorithm,
            bit_length: self.bit_length,
        }
    }

    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    pub fn bit_length(&self) -> u32 {
        self.bit_length
    }

    /// Size in bytes of signatures and ciphertexts produced with this key.
    pub fn size(&self) -> usize {
        full_len(self.bit_length)
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn public_exponent(&self) -> u32 {
        self.public_exponent
    }

    /// Lowercase hex SHA-256 of the big-endian modulus.
    pub fn fingerprint(&self) -> String {
        hex::encode(HashAlgorithm::Sha256.digest(&self.modulus.to_bytes_be()))
    }

    pub fn material(&self) -> RsaKeyMaterial {
        RsaKeyMaterial {
            bit_length: self.bit_length,
            modulus: self.modulus.clone(),
            public_exponent: self.public_exponent,
            private: None,
        }
    }

    /// The key in the form the RSA library operates on.
    pub fn rsa_key(&self) -> &RsaPublicKey {
        &self.key
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm
            && self.bit_length == other.bit_length
            && self.modulus == other.modulus
            && self.public_exponent == other.public_exponent
    }
}

impl Eq for PublicKey {}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("algorithm", &self.algorithm)
            .field("bit_length", &self.bit_length)
            .field("public_exponent", &self.public_exponent)
            .field("modulus", &hex::encode(self.modulus.to_bytes_be()))
            .finish()
    }
}

/**
    An RSA private key imported from a PRIVATEKEYBLOB.

    Immutable once constructed. The public half is never stored separately;
    [`Self::public_key`] projects it from the same modulus and exponent.
*/
#[derive(Clone)]
pub struct PrivateKey {
    algorithm: AlgorithmId,
    bit_length: u32,
    modulus: BigUint,
    public_exponent: u32,
    components: RsaPrivateComponents,
    key: RsaPrivateKey,
}

impl PrivateKey {
    /**
        Parse a PRIVATEKEYBLOB.

        Validation order:
          1. BLOBHEADER is a version 2 PRIVATEKEYBLOB for an RSA algorithm,
             followed by an RSAPUBKEY with magic "RSA2"
          2. the declared bit length is supported
          3. the blob length matches the bit length exactly
        Then every field is reversed into big-endian form and the CRT
        parameters are checked against the primes.
    */
    pub fn from_blob(data: impl AsRef<[u8]>) -> WinCryptoResult<Self> {
        let data = data.as_ref();
        Self::parse(data)
            .inspect(|key| {
                tracing::debug!(
                    algorithm = %key.algorithm,
                    bits = key.bit_length,
                    "imported RSA private key blob"
                );
            })
            .inspect_err(|e| {
                tracing::debug!(error = %e, len = data.len(), "rejected RSA private key blob");
            })
    }

    fn parse(data: &[u8]) -> WinCryptoResult<Self> {
        let mut r = Reader::new(data);
        let (algorithm, bits, public_exponent) =
            read_rsa_prefix(&mut r, BlobType::PrivateKey, RSA2_MAGIC)?;
        check_exact_len(data.len(), private_blob_len(bits))?;

        let full = full_len(bits);
        let half = half_len(bits);

        let modulus = uint_from_reversed(r.bytes(full)?);
        let prime_p = uint_from_reversed(r.bytes(half)?);
        let prime_q = uint_from_reversed(r.bytes(half)?);
        let d_mod_p1 = uint_from_reversed(r.bytes(half)?);
        let d_mod_q1 = uint_from_reversed(r.bytes(half)?);
        let coefficient = uint_from_reversed(r.bytes(half)?);
        let private_exponent = uint_from_reversed(r.bytes(full)?);
        r.finish()?;

        let components = RsaPrivateComponents {
            private_exponent,
            prime_p,
            prime_q,
            d_mod_p1,
            d_mod_q1,
            coefficient,
        };
        components.check(&modulus)?;

        let key = RsaPrivateKey::from_components(
            modulus.clone(),
            BigUint::from(public_exponent),
            components.private_exponent.clone(),
            vec![components.prime_p.clone(), components.prime_q.clone()],
        )
        .map_err(|e| BlobDefect::InconsistentKey(e.to_string()))?;

        Ok(Self {
            algorithm,
            bit_length: bits,
            modulus,
            public_exponent,
            components,
            key,
        })
    }

    /**
        Parse a base64-encoded PRIVATEKEYBLOB.
    */
    pub fn from_base64(blob: impl AsRef<[u8]>) -> WinCryptoResult<Self> {
        Self::from_blob(decode_base64(blob.as_ref())?)
    }

    /**
        Wrap a two-prime private key obtained elsewhere (e.g. PKCS#1 / PKCS#8)
        so it can be exported as a PRIVATEKEYBLOB.
    */
    pub fn from_rsa(key: RsaPrivateKey, algorithm: AlgorithmId) -> WinCryptoResult<Self> {
        let bit_length = checked_bit_length(key.size(), algorithm)?;
        let public_exponent = exponent_to_u32(key.e())?;

        let [prime_p, prime_q] = key.primes() else {
            return Err(BlobDefect::InconsistentKey(format!(
                "blobs hold exactly two primes, key has {}",
                key.primes().len()
            ))
            .into());
        };
        let components =
            RsaPrivateComponents::derive(key.d().clone(), prime_p.clone(), prime_q.clone())?;
        components.check(key.n())?;

        Ok(Self {
            algorithm,
            bit_length,
            modulus: key.n().clone(),
            public_exponent,
            components,
            key,
        })
    }

    /**
        Serialize into PRIVATEKEYBLOB bytes.
    */
    pub fn to_blob(&self) -> WinCryptoResult<Vec<u8>> {
        let full = full_len(self.bit_length);
        let half = half_len(self.bit_length);
        let c = &self.components;

        let mut buffer = Vec::with_capacity(private_blob_len(self.bit_length));
        write_rsa_prefix(
            &mut buffer,
            BlobType::PrivateKey,
            self.algorithm,
            RSA2_MAGIC,
            self.bit_length,
            self.public_exponent,
        );
        write_field(&mut buffer, "modulus", &self.modulus, full)?;
        write_field(&mut buffer, "prime1", &c.prime_p, half)?;
        write_field(&mut buffer, "prime2", &c.prime_q, half)?;
        write_field(&mut buffer, "exponent1", &c.d_mod_p1, half)?;
        write_field(&mut buffer, "exponent2", &c.d_mod_q1, half)?;
        write_field(&mut buffer, "coefficient", &c.coefficient, half)?;
        write_field(&mut buffer, "privateExponent", &c.private_exponent, full)?;
        Ok(buffer)
    }

    /**
        Serialize to a base64-encoded PRIVATEKEYBLOB.
    */
    pub fn to_base64(&self) -> WinCryptoResult<String> {
        self.to_blob().map(|b| data_encoding::BASE64.encode(&b))
    }

    pub fn header(&self) -> KeyBlobHeader {
        KeyBlobHeader {
            blob_type: BlobType::PrivateKey,
            version: crate::constants::CUR_BLOB_VERSION,
            algorithm: self.algorithm,
            bit_length: self.bit_length,
        }
    }

    /**
        The public half of this key.
    */
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            algorithm: self.algorithm,
            bit_length: self.bit_length,
            modulus: self.modulus.clone(),
            public_exponent: self.public_exponent,
            key: self.key.to_public_key(),
        }
    }

    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    pub fn bit_length(&self) -> u32 {
        self.bit_length
    }

    /// Size in bytes of signatures and ciphertexts produced with this key.
    pub fn size(&self) -> usize {
        full_len(self.bit_length)
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn public_exponent(&self) -> u32 {
        self.public_exponent
    }

    pub fn components(&self) -> &RsaPrivateComponents {
        &self.components
    }

    pub fn material(&self) -> RsaKeyMaterial {
        RsaKeyMaterial {
            bit_length: self.bit_length,
            modulus: self.modulus.clone(),
            public_exponent: self.public_exponent,
            private: Some(self.components.clone()),
        }
    }

    /// The key in the form the RSA library operates on.
    pub fn rsa_key(&self) -> &RsaPrivateKey {
        &self.key
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm && self.material() == other.material()
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("algorithm", &self.algorithm)
            .field("bit_length", &self.bit_length)
            .field("public_exponent", &self.public_exponent)
            .finish_non_exhaustive()
    }
}

/**
    Read BLOBHEADER + RSAPUBKEY, returning (algorithm, bitlen, pubexp).
*/
fn read_rsa_prefix(
    r: &mut Reader<'_>,
    blob_type: BlobType,
    magic: u32,
) -> WinCryptoResult<(AlgorithmId, u32, u32)> {
    let algorithm = read_blob_header(r, blob_type)?;
    if !algorithm.is_rsa() {
        return Err(WinCryptoError::UnsupportedAlgorithm(algorithm.to_u32()));
    }

    let found = r.u32_le()?;
    if found != magic {
        return Err(BlobDefect::BadMagic(found).into());
    }
    let bits = r.u32_le()?;
    let public_exponent = r.u32_le()?;

    if !algorithm.supports_bits(bits) {
        return Err(WinCryptoError::UnsupportedKeySize { algorithm, bits });
    }

    Ok((algorithm, bits, public_exponent))
}

fn write_rsa_prefix(
    buffer: &mut Vec<u8>,
    blob_type: BlobType,
    algorithm: AlgorithmId,
    magic: u32,
    bits: u32,
    public_exponent: u32,
) {
    write_blob_header(buffer, blob_type, algorithm);
    buffer.extend(&magic.to_le_bytes());
    buffer.extend(&bits.to_le_bytes());
    buffer.extend(&public_exponent.to_le_bytes());
}

fn write_field(
    buffer: &mut Vec<u8>,
    name: &str,
    value: &BigUint,
    width: usize,
) -> Result<(), BlobDefect> {
    let field = uint_to_reversed(value, width).ok_or_else(|| {
        BlobDefect::InconsistentKey(format!("{name} does not fit in {width} bytes"))
    })?;
    buffer.extend(field);
    Ok(())
}

fn check_exact_len(actual: usize, expected: usize) -> Result<(), BlobDefect> {
    match actual.cmp(&expected) {
        Ordering::Less => Err(BlobDefect::Truncated { expected, actual }),
        Ordering::Greater => Err(BlobDefect::TrailingBytes(actual - expected)),
        Ordering::Equal => Ok(()),
    }
}

fn checked_bit_length(size_bytes: usize, algorithm: AlgorithmId) -> WinCryptoResult<u32> {
    if !algorithm.is_rsa() {
        return Err(WinCryptoError::UnsupportedAlgorithm(algorithm.to_u32()));
    }
    let bits = u32::try_from(size_bytes * 8).unwrap_or(u32::MAX);
    if !algorithm.supports_bits(bits) {
        return Err(WinCryptoError::UnsupportedKeySize { algorithm, bits });
    }
    Ok(bits)
}

fn exponent_to_u32(e: &BigUint) -> Result<u32, BlobDefect> {
    let be = e.to_bytes_be();
    let be = &be[be.iter().position(|&b| b != 0).unwrap_or(be.len())..];
    if be.len() > 4 {
        return Err(BlobDefect::InconsistentKey(
            "public exponent does not fit in 32 bits".into(),
        ));
    }
    Ok(be.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32))
}

pub(crate) fn decode_base64(blob: &[u8]) -> Result<Vec<u8>, BlobDefect> {
    data_encoding::BASE64
        .decode(blob)
        .map_err(|e| BlobDefect::InvalidBase64(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGN_BLOB: &[u8] = include_bytes!("../../testfiles/privatekey.sign");
    const KEYX_BLOB: &[u8] = include_bytes!("../../testfiles/privatekey.keyx");
    const SIGN_PUBLIC_BLOB: &[u8] = include_bytes!("../../testfiles/publickey.sign");

    fn malformed(err: WinCryptoError) -> BlobDefect {
        match err {
            WinCryptoError::MalformedBlob(defect) => defect,
            other => panic!("expected MalformedBlob, got {other:?}"),
        }
    }

    #[test]
    fn blob_lengths() {
        assert_eq!(private_blob_len(2048), 1172);
        assert_eq!(public_blob_len(2048), 276);
        assert_eq!(private_blob_len(512), 20 + 64 * 2 + 32 * 5);
        // bit lengths that are not a multiple of 16 round the CRT fields up
        assert_eq!(half_len(1032), 65);
        assert_eq!(full_len(1032), 129);
    }

    #[test]
    fn parse_sign_blob() {
        let key = PrivateKey::from_blob(SIGN_BLOB).expect("failed to parse sign blob");
        assert_eq!(key.algorithm(), AlgorithmId::RsaSign);
        assert_eq!(key.bit_length(), 2048);
        assert_eq!(key.size(), 256);
        assert_eq!(key.public_exponent(), 65537);
        assert_eq!(key.rsa_key().size(), 256);
    }

    #[test]
    fn parse_keyx_blob() {
        let key = PrivateKey::from_blob(KEYX_BLOB).expect("failed to parse keyx blob");
        assert_eq!(key.algorithm(), AlgorithmId::RsaKeyx);
        assert_eq!(key.header().blob_type, BlobType::PrivateKey);
        assert_eq!(key.header().version, 2);
    }

    #[test]
    fn modulus_is_reversed_exactly_once() {
        let key = PrivateKey::from_blob(SIGN_BLOB).unwrap();
        let raw = &SIGN_BLOB[20..20 + 256];
        let mut be = key.modulus().to_bytes_be();
        be.reverse();
        assert_eq!(be, raw);
        // The least-significant stored byte of an odd modulus is odd
        assert_eq!(raw[0] & 1, 1);
    }

    #[test]
    fn parse_is_deterministic() {
        let a = PrivateKey::from_blob(SIGN_BLOB).unwrap();
        let b = PrivateKey::from_blob(SIGN_BLOB).unwrap();
        assert_eq!(a.material(), b.material());
        assert_eq!(a, b);
    }

    #[test]
    fn public_key_is_projection() {
        let key = PrivateKey::from_blob(SIGN_BLOB).unwrap();
        let public = key.public_key();
        assert_eq!(public.material(), key.material().public_projection());
        assert!(!public.material().is_private());
        assert_eq!(public.rsa_key(), &key.rsa_key().to_public_key());
    }

    #[test]
    fn public_blob_matches_private_projection() {
        let public = PublicKey::from_blob(SIGN_PUBLIC_BLOB).unwrap();
        let private = PrivateKey::from_blob(SIGN_BLOB).unwrap();
        assert_eq!(public, private.public_key());
    }

    #[test]
    fn fingerprint_identifies_modulus() {
        let sign = PublicKey::from_blob(SIGN_PUBLIC_BLOB).unwrap();
        let keyx = PrivateKey::from_blob(KEYX_BLOB).unwrap().public_key();
        assert_eq!(sign.fingerprint().len(), 64);
        assert_eq!(
            sign.fingerprint(),
            PrivateKey::from_blob(SIGN_BLOB).unwrap().public_key().fingerprint()
        );
        assert_ne!(sign.fingerprint(), keyx.fingerprint());
    }

    #[test]
    fn private_round_trip() {
        let key = PrivateKey::from_blob(SIGN_BLOB).unwrap();
        assert_eq!(key.to_blob().unwrap(), SIGN_BLOB);
    }

    #[test]
    fn public_round_trip() {
        let key = PrivateKey::from_blob(KEYX_BLOB).unwrap();
        let blob = key.public_key().to_blob().unwrap();
        assert_eq!(blob.len(), public_blob_len(2048));
        assert_eq!(PublicKey::from_blob(&blob).unwrap(), key.public_key());
        let public = PublicKey::from_blob(SIGN_PUBLIC_BLOB).unwrap();
        assert_eq!(public.to_blob().unwrap(), SIGN_PUBLIC_BLOB);
    }

    #[test]
    fn base64_round_trip() {
        let key = PrivateKey::from_blob(SIGN_BLOB).unwrap();
        let b64 = key.to_base64().unwrap();
        assert_eq!(PrivateKey::from_base64(&b64).unwrap(), key);
        let err = PrivateKey::from_base64("not base64!").unwrap_err();
        assert!(matches!(malformed(err), BlobDefect::InvalidBase64(_)));
    }

    #[test]
    fn from_rsa_reproduces_blob() {
        let key = PrivateKey::from_blob(KEYX_BLOB).unwrap();
        let rebuilt = PrivateKey::from_rsa(key.rsa_key().clone(), AlgorithmId::RsaKeyx).unwrap();
        assert_eq!(rebuilt.components(), key.components());
        assert_eq!(rebuilt.to_blob().unwrap(), KEYX_BLOB);
    }

    #[test]
    fn from_rsa_rejects_aes_algorithm() {
        let key = PrivateKey::from_blob(KEYX_BLOB).unwrap();
        let err = PrivateKey::from_rsa(key.rsa_key().clone(), AlgorithmId::Aes128).unwrap_err();
        assert_eq!(err, WinCryptoError::UnsupportedAlgorithm(0x660E));
    }

    #[test]
    fn truncated_blob() {
        for len in [0, 1, 7, 8, 19, 20, 276, SIGN_BLOB.len() - 1] {
            let err = PrivateKey::from_blob(&SIGN_BLOB[..len]).unwrap_err();
            assert!(
                matches!(malformed(err), BlobDefect::Truncated { .. }),
                "length {len}"
            );
        }
    }

    #[test]
    fn trailing_bytes() {
        let mut data = SIGN_BLOB.to_vec();
        data.push(0);
        let err = PrivateKey::from_blob(&data).unwrap_err();
        assert_eq!(malformed(err), BlobDefect::TrailingBytes(1));
    }

    #[test]
    fn bad_magic() {
        let mut data = SIGN_BLOB.to_vec();
        data[8..12].copy_from_slice(b"RSA1");
        let err = PrivateKey::from_blob(&data).unwrap_err();
        assert_eq!(malformed(err), BlobDefect::BadMagic(RSA1_MAGIC));
    }

    #[test]
    fn public_blob_is_not_private() {
        let err = PrivateKey::from_blob(SIGN_PUBLIC_BLOB).unwrap_err();
        assert_eq!(malformed(err), BlobDefect::BadBlobType(0x06));
    }

    #[test]
    fn aes_algorithm_in_rsa_blob() {
        let mut data = SIGN_BLOB.to_vec();
        data[4..8].copy_from_slice(&0x6610u32.to_le_bytes());
        let err = PrivateKey::from_blob(&data).unwrap_err();
        assert_eq!(err, WinCryptoError::UnsupportedAlgorithm(0x6610));
    }

    #[test]
    fn unsupported_bit_length() {
        for bits in [0u32, 256, 2047, 32768] {
            let mut data = SIGN_BLOB.to_vec();
            data[12..16].copy_from_slice(&bits.to_le_bytes());
            let err = PrivateKey::from_blob(&data).unwrap_err();
            assert_eq!(
                err,
                WinCryptoError::UnsupportedKeySize {
                    algorithm: AlgorithmId::RsaSign,
                    bits
                }
            );
        }
    }

    #[test]
    fn declared_bit_length_drives_expected_length() {
        // 1024-bit declared size with a 2048-bit body is a length mismatch
        let mut data = SIGN_BLOB.to_vec();
        data[12..16].copy_from_slice(&1024u32.to_le_bytes());
        let err = PrivateKey::from_blob(&data).unwrap_err();
        assert_eq!(
            malformed(err),
            BlobDefect::TrailingBytes(SIGN_BLOB.len() - private_blob_len(1024))
        );
    }

    #[test]
    fn corrupted_prime_rejected() {
        let mut data = SIGN_BLOB.to_vec();
        // first byte of prime1
        data[20 + 256] ^= 0x02;
        let err = PrivateKey::from_blob(&data).unwrap_err();
        assert!(matches!(malformed(err), BlobDefect::InconsistentKey(_)));
    }

    #[test]
    fn corrupted_coefficient_rejected() {
        let mut data = SIGN_BLOB.to_vec();
        data[20 + 256 + 4 * 128] ^= 0x01;
        let err = PrivateKey::from_blob(&data).unwrap_err();
        assert!(matches!(malformed(err), BlobDefect::InconsistentKey(_)));
    }

    #[test]
    fn debug_hides_private_components() {
        let key = PrivateKey::from_blob(SIGN_BLOB).unwrap();
        let printed = format!("{key:?} {:?}", key.components());
        assert!(printed.contains("RsaSign"));
        let d = hex::encode(key.components().private_exponent.to_bytes_be());
        assert!(!printed.contains(&d[..16]));
    }
}
