use crate::error::{WinCryptoError, WinCryptoResult};

/**
    Apply PKCS#7 padding before AES-CBC encryption.

    Appends 1 to `block_size` bytes, each with the value of the padding length.
    Block-aligned input gains a full block of padding.
*/
pub fn pkcs7_pad(data: &[u8], block_size: usize) -> Vec<u8> {
    let pad = block_size - (data.len() % block_size);
    let mut out = Vec::with_capacity(data.len() + pad);
    out.extend_from_slice(data);
    out.resize(data.len() + pad, pad as u8);
    out
}

/**
    Remove PKCS#7 padding from a decrypted AES-CBC plaintext.

    The last byte indicates the number of padding bytes (1 to `block_size`).
    All padding bytes must have the same value as the last byte.
    Malformed padding is reported as a failed crypto operation, since it
    usually means the wrong key or IV was used.
*/
pub fn pkcs7_unpad(data: &[u8], block_size: usize) -> WinCryptoResult<Vec<u8>> {
    if data.is_empty() || !data.len().is_multiple_of(block_size) {
        return Err(invalid_padding());
    }

    let pad = data[data.len() - 1] as usize;
    if pad == 0 || pad > block_size || pad > data.len() {
        return Err(invalid_padding());
    }

    if data[data.len() - pad..].iter().any(|&byte| byte as usize != pad) {
        return Err(invalid_padding());
    }

    Ok(data[..data.len() - pad].to_vec())
}

fn invalid_padding() -> WinCryptoError {
    WinCryptoError::CryptoOperationFailed("invalid PKCS#7 padding".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_padding_error(err: &WinCryptoError) -> bool {
        matches!(err, WinCryptoError::CryptoOperationFailed(msg) if msg.contains("PKCS#7"))
    }

    #[test]
    fn pad_unpad_round_trip() {
        for len in 0..=48 {
            let data: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let padded = pkcs7_pad(&data, 16);
            assert!(padded.len().is_multiple_of(16));
            assert!(padded.len() > data.len());
            assert_eq!(pkcs7_unpad(&padded, 16).unwrap(), data);
        }
    }

    #[test]
    fn pad_exact_block_adds_full_block() {
        let padded = pkcs7_pad(&[0u8; 16], 16);
        assert_eq!(padded.len(), 32);
        assert!(padded[16..].iter().all(|&b| b == 16));
    }

    #[test]
    fn pad_four_bytes() {
        let padded = pkcs7_pad(&[1, 2, 3, 4], 16);
        assert_eq!(&padded[..4], &[1, 2, 3, 4]);
        assert!(padded[4..].iter().all(|&b| b == 12));
    }

    #[test]
    fn unpad_empty_fails() {
        assert!(is_padding_error(&pkcs7_unpad(&[], 16).unwrap_err()));
    }

    #[test]
    fn unpad_bad_pad_values() {
        for last in [0u8, 17, 255] {
            let mut block = [0u8; 16];
            block[15] = last;
            assert!(is_padding_error(&pkcs7_unpad(&block, 16).unwrap_err()));
        }
    }

    #[test]
    fn unpad_inconsistent_padding() {
        let mut block = [4u8; 16];
        block[12] = 99;
        assert!(is_padding_error(&pkcs7_unpad(&block, 16).unwrap_err()));
    }

    #[test]
    fn unpad_not_block_aligned() {
        assert!(is_padding_error(&pkcs7_unpad(&[1u8; 15], 16).unwrap_err()));
    }
}
