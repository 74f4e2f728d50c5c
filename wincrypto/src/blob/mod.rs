/*!
    CryptoAPI key blob codecs.

    A blob's first byte selects its kind; [`KeyBlob::from_bytes`] dispatches
    on it so callers holding an unknown blob don't have to guess.
*/

mod aes;
mod header;
mod rsa;

pub use self::aes::AesKey;
pub use self::header::KeyBlobHeader;
pub use self::rsa::{
    PrivateKey, PublicKey, RsaKeyMaterial, RsaPrivateComponents, private_blob_len,
    public_blob_len,
};

pub(crate) use self::rsa::decode_base64;

use crate::error::{BlobDefect, WinCryptoResult};
use crate::types::BlobType;

/**
    Any key blob this crate understands.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyBlob {
    Private(PrivateKey),
    Public(PublicKey),
    PlainText(AesKey),
}

impl KeyBlob {
    /**
        Parse a blob of any supported type.
    */
    pub fn from_bytes(data: impl AsRef<[u8]>) -> WinCryptoResult<Self> {
        let data = data.as_ref();
        let Some(&first) = data.first() else {
            return Err(BlobDefect::Truncated {
                expected: 1,
                actual: 0,
            }
            .into());
        };

        match BlobType::from_u8(first) {
            Some(BlobType::PrivateKey) => PrivateKey::from_blob(data).map(Self::Private),
            Some(BlobType::PublicKey) => PublicKey::from_blob(data).map(Self::Public),
            Some(BlobType::PlainTextKey) => AesKey::from_blob(data).map(Self::PlainText),
            None => Err(BlobDefect::BadBlobType(first).into()),
        }
    }

    /**
        Parse a base64-encoded blob of any supported type.
    */
    pub fn from_base64(blob: impl AsRef<[u8]>) -> WinCryptoResult<Self> {
        Self::from_bytes(decode_base64(blob.as_ref())?)
    }

    pub fn to_bytes(&self) -> WinCryptoResult<Vec<u8>> {
        match self {
            Self::Private(key) => key.to_blob(),
            Self::Public(key) => key.to_blob(),
            Self::PlainText(key) => Ok(key.to_blob()),
        }
    }

    pub fn to_base64(&self) -> WinCryptoResult<String> {
        Ok(data_encoding::BASE64.encode(&self.to_bytes()?))
    }

    pub fn header(&self) -> KeyBlobHeader {
        match self {
            Self::Private(key) => key.header(),
            Self::Public(key) => key.header(),
            Self::PlainText(key) => key.header(),
        }
    }

    pub fn blob_type(&self) -> BlobType {
        self.header().blob_type
    }

    /**
        The public half of an RSA blob, or `None` for symmetric keys.
    */
    pub fn public_key(&self) -> Option<PublicKey> {
        match self {
            Self::Private(key) => Some(key.public_key()),
            Self::Public(key) => Some(key.clone()),
            Self::PlainText(_) => None,
        }
    }
}

impl From<PrivateKey> for KeyBlob {
    fn from(key: PrivateKey) -> Self {
        Self::Private(key)
    }
}

impl From<PublicKey> for KeyBlob {
    fn from(key: PublicKey) -> Self {
        Self::Public(key)
    }
}

impl From<AesKey> for KeyBlob {
    fn from(key: AesKey) -> Self {
        Self::PlainText(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WinCryptoError;
    use crate::types::AlgorithmId;

    const SIGN_BLOB: &[u8] = include_bytes!("../../testfiles/privatekey.sign");
    const SIGN_PUBLIC_BLOB: &[u8] = include_bytes!("../../testfiles/publickey.sign");

    #[test]
    fn dispatch_on_blob_type() {
        let blob = KeyBlob::from_bytes(SIGN_BLOB).unwrap();
        assert!(matches!(blob, KeyBlob::Private(_)));
        assert_eq!(blob.header().algorithm, AlgorithmId::RsaSign);
        assert_eq!(blob.header().bit_length, 2048);

        let blob = KeyBlob::from_bytes(SIGN_PUBLIC_BLOB).unwrap();
        assert!(matches!(blob, KeyBlob::Public(_)));
        assert_eq!(blob.blob_type(), BlobType::PublicKey);

        let aes = AesKey::new([1u8; 32]).unwrap().to_blob();
        let blob = KeyBlob::from_bytes(&aes).unwrap();
        assert_eq!(blob, KeyBlob::PlainText(AesKey::new([1u8; 32]).unwrap()));
        assert!(blob.public_key().is_none());
    }

    #[test]
    fn private_and_public_share_public_key() {
        let private = KeyBlob::from_bytes(SIGN_BLOB).unwrap();
        let public = KeyBlob::from_bytes(SIGN_PUBLIC_BLOB).unwrap();
        assert_eq!(private.public_key(), public.public_key());
    }

    #[test]
    fn to_bytes_round_trip() {
        let blob = KeyBlob::from_bytes(SIGN_BLOB).unwrap();
        assert_eq!(blob.to_bytes().unwrap(), SIGN_BLOB);
        let b64 = blob.to_base64().unwrap();
        assert_eq!(KeyBlob::from_base64(b64).unwrap(), blob);
    }

    #[test]
    fn unknown_blob_type() {
        let err = KeyBlob::from_bytes([0x0Cu8, 0x02, 0, 0]).unwrap_err();
        assert_eq!(err, WinCryptoError::MalformedBlob(BlobDefect::BadBlobType(0x0C)));
    }

    #[test]
    fn empty_input() {
        let err = KeyBlob::from_bytes(Vec::<u8>::new()).unwrap_err();
        assert!(matches!(
            err,
            WinCryptoError::MalformedBlob(BlobDefect::Truncated { .. })
        ));
    }

    #[test]
    fn invalid_base64() {
        let err = KeyBlob::from_base64("not base64!").unwrap_err();
        assert!(matches!(
            err,
            WinCryptoError::MalformedBlob(BlobDefect::InvalidBase64(_))
        ));
    }
}
