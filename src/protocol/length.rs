//! Big-endian length field conversion
//!
//! Payload lengths travel as either a 1-byte (short record) or 4-byte field.
//! Both directions are defined for arbitrary widths.

/// Interpret up to 8 bytes as a big-endian integer.
///
/// Longer inputs only use their last 8 bytes; shorter inputs are treated as
/// left-padded with zeros.
#[must_use]
pub fn bytes_to_u64(bytes: &[u8]) -> u64 {
    let tail = &bytes[bytes.len().saturating_sub(8)..];
    let mut buf = [0u8; 8];
    buf[8 - tail.len()..].copy_from_slice(tail);
    u64::from_be_bytes(buf)
}

/// Produce exactly `width` big-endian bytes for `value`.
///
/// Widths of 8 or more are left-padded with zeros; narrower widths keep the
/// least significant `width` bytes.
#[must_use]
pub fn u64_to_bytes(value: u64, width: usize) -> Vec<u8> {
    let be = value.to_be_bytes();
    if width >= 8 {
        let mut out = vec![0u8; width];
        out[width - 8..].copy_from_slice(&be);
        out
    } else {
        be[8 - width..].to_vec()
    }
}
