//! Additive frame checksum.
//!
//! The checksum covers the payload bytes only; the length byte is not part of
//! the checksum domain. Both the encoder and the decoder go through this
//! module so the two sides cannot drift apart.

/// Fold one byte into a running checksum.
#[inline]
pub fn accumulate(acc: u8, byte: u8) -> u8 {
    acc.wrapping_add(byte)
}

/// Wrapping 8-bit sum of `bytes`.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| accumulate(acc, *b))
}

#[cfg(test)]
mod tests {
    use super::{accumulate, checksum};

    #[test]
    fn checksum_of_empty_is_zero() {
        assert_eq!(checksum(&[]), 0);
    }

    #[test]
    fn checksum_sums_ascii() {
        assert_eq!(checksum(b"ABC"), 0xC6);
    }

    #[test]
    fn checksum_wraps_on_overflow() {
        assert_eq!(checksum(&[0xFF, 0x02]), 0x01);
        assert_eq!(checksum(&[0x80; 4]), 0x00);
    }

    #[test]
    fn accumulate_matches_checksum() {
        let bytes = [0x10, 0x20, 0x30, 0xF0];
        let folded = bytes.iter().fold(0u8, |acc, b| accumulate(acc, *b));
        assert_eq!(folded, checksum(&bytes));
    }

    #[test]
    fn length_byte_is_not_part_of_the_sum() {
        let payload = [0x10, 0x20, 0x30];
        assert_eq!(checksum(&payload), 0x60);
    }
}
