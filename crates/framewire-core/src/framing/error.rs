use thiserror::Error;

/// Errors returned when building a frame.
///
/// # Examples
/// ```
/// use framewire_core::{EncodeError, encode};
///
/// let err = encode(&[0u8; 256]).unwrap_err();
/// assert!(matches!(err, EncodeError::PayloadTooLarge { len: 256, .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("payload too large: {len} bytes (max {max})")]
    PayloadTooLarge { len: usize, max: usize },
}

/// Errors returned when parsing textual byte input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("odd number of hex digits: {digits}")]
    OddLength { digits: usize },
    #[error("invalid hex digit {digit:?} at position {position}")]
    InvalidDigit { digit: char, position: usize },
}
