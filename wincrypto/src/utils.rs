use rsa::BigUint;

/**
    Reverse the byte order of `data`.

    This is the single conversion between the legacy wire order
    (least-significant byte first) and the big-endian order expected by
    standard RSA implementations. Every RSA boundary goes through it,
    and applying it twice returns the original bytes.
*/
pub fn reverse_bytes(data: &[u8]) -> Vec<u8> {
    data.iter().rev().copied().collect()
}

/**
    Decode a byte-reversed blob field into an unsigned integer.
*/
pub(crate) fn uint_from_reversed(field: &[u8]) -> BigUint {
    BigUint::from_bytes_be(&reverse_bytes(field))
}

/**
    Encode an unsigned integer as a byte-reversed field of exactly `width` bytes.

    Returns `None` if the value does not fit.
*/
pub(crate) fn uint_to_reversed(value: &BigUint, width: usize) -> Option<Vec<u8>> {
    let be = value.to_bytes_be();
    // BigUint encodes zero as a single 0x00 byte
    let be = match be.iter().position(|&b| b != 0) {
        Some(first) => &be[first..],
        None => &[][..],
    };
    if be.len() > width {
        return None;
    }
    let mut padded = vec![0u8; width - be.len()];
    padded.extend_from_slice(be);
    Some(reverse_bytes(&padded))
}
