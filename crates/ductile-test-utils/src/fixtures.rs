//! Fixtures for sequences of little-endian `i32` elements.

use std::cmp::Ordering;

/// Encode an `i32` as a 4-byte element.
pub fn bytes_i32(value: i32) -> [u8; 4] {
    value.to_le_bytes()
}

/// Decode a 4-byte element.
///
/// # Panics
///
/// Panics if `bytes` is not exactly four bytes long.
pub fn i32_at(bytes: &[u8]) -> i32 {
    let raw: [u8; 4] = bytes.try_into().expect("i32 element must be 4 bytes");
    i32::from_le_bytes(raw)
}

/// Three-way comparison of two `i32` elements.
pub fn cmp_i32(a: &[u8], b: &[u8]) -> Ordering {
    i32_at(a).cmp(&i32_at(b))
}

/// `values` encoded back to back, ready for block operations.
pub fn block_i32(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode() {
        assert_eq!(i32_at(&bytes_i32(-17)), -17);
    }

    #[test]
    fn block_layout_is_contiguous() {
        let block = block_i32(&[1, 2]);
        assert_eq!(block.len(), 8);
        assert_eq!(i32_at(&block[4..]), 2);
    }

    #[test]
    fn comparison_is_numeric() {
        assert_eq!(cmp_i32(&bytes_i32(-1), &bytes_i32(1)), Ordering::Less);
        assert_eq!(cmp_i32(&bytes_i32(3), &bytes_i32(3)), Ordering::Equal);
    }
}
