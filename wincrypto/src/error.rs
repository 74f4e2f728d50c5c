use thiserror::Error;

use crate::types::AlgorithmId;

/**
    Errors produced by blob parsing and the byte-order adapters.

    Every error is terminal for the call that produced it.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WinCryptoError {
    // ── Key blob parsing ──────────────────────────────────────────────
    #[error("malformed key blob: {0}")]
    MalformedBlob(#[from] BlobDefect),
    #[error("unsupported algorithm id {0:#06x}")]
    UnsupportedAlgorithm(u32),
    #[error("unsupported key size {bits} bits for {algorithm}")]
    UnsupportedKeySize { algorithm: AlgorithmId, bits: u32 },

    // ── Adapter input validation ──────────────────────────────────────
    #[error("invalid AES key length {0} (expected 16, 24 or 32 bytes)")]
    InvalidKeyLength(usize),
    #[error("invalid input length {0}: {1}")]
    InvalidInputLength(usize, &'static str),

    // ── Trusted library ───────────────────────────────────────────────
    #[error("crypto operation failed: {0}")]
    CryptoOperationFailed(String),
}

/**
    The specific validation step a malformed blob failed.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlobDefect {
    #[error("blob is truncated (need {expected} bytes, have {actual})")]
    Truncated { expected: usize, actual: usize },
    #[error("blob has {0} trailing bytes")]
    TrailingBytes(usize),
    #[error("unexpected blob type {0:#04x}")]
    BadBlobType(u8),
    #[error("unsupported blob version {0}")]
    BadVersion(u8),
    #[error("bad RSA magic {0:#010x}")]
    BadMagic(u32),
    #[error("key components are inconsistent: {0}")]
    InconsistentKey(String),
    #[error("invalid base64: {0}")]
    InvalidBase64(String),
}

impl From<rsa::Error> for WinCryptoError {
    fn from(e: rsa::Error) -> Self {
        Self::CryptoOperationFailed(e.to_string())
    }
}

/**
    Type alias for results that may return a [`WinCryptoError`].
*/
pub type WinCryptoResult<T> = std::result::Result<T, WinCryptoError>;

/**
    Error returned by `FromStr` implementations on enum types.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}
