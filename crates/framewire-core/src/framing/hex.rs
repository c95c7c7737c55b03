use super::error::InputError;

/// Lowercase hex rendering without separators.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Parse a hex string into bytes.
///
/// ASCII whitespace, `:` and `-` separators are ignored, as is an optional
/// `0x` prefix, so `"02 03 41"`, `"02:03:41"` and `"0x020341"` all parse.
///
/// # Errors
/// Returns `InputError` on a non-hex digit or an odd digit count.
pub fn parse_hex(input: &str) -> Result<Vec<u8>, InputError> {
    let trimmed = input.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let mut digits = Vec::with_capacity(body.len());
    for (position, ch) in body.chars().enumerate() {
        if ch.is_ascii_whitespace() || ch == ':' || ch == '-' {
            continue;
        }
        let value = ch
            .to_digit(16)
            .ok_or(InputError::InvalidDigit { digit: ch, position })?;
        digits.push(value as u8);
    }

    if digits.len() % 2 != 0 {
        return Err(InputError::OddLength {
            digits: digits.len(),
        });
    }

    Ok(digits
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{parse_hex, to_hex};
    use crate::framing::error::InputError;

    #[test]
    fn to_hex_is_lowercase() {
        assert_eq!(to_hex(&[0x02, 0xAB, 0x03]), "02ab03");
    }

    #[test]
    fn parse_hex_accepts_separators() {
        assert_eq!(parse_hex("02 03:41-42").unwrap(), vec![0x02, 0x03, 0x41, 0x42]);
        assert_eq!(parse_hex("0xC6").unwrap(), vec![0xC6]);
    }

    #[test]
    fn parse_hex_empty() {
        assert!(parse_hex("").unwrap().is_empty());
    }

    #[test]
    fn parse_hex_rejects_odd_digits() {
        let err = parse_hex("020").unwrap_err();
        assert_eq!(err, InputError::OddLength { digits: 3 });
    }

    #[test]
    fn parse_hex_rejects_bad_digit() {
        let err = parse_hex("0g").unwrap_err();
        assert!(err.to_string().contains("invalid hex digit"));
    }
}
