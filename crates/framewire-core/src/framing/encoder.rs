use super::checksum::checksum;
use super::error::EncodeError;
use super::layout;

/// Wire size of a frame carrying `payload_len` bytes.
pub const fn frame_len(payload_len: usize) -> usize {
    payload_len + layout::FRAME_OVERHEAD
}

/// Build a complete frame around `payload`.
///
/// # Examples
/// ```
/// use framewire_core::encode;
///
/// let frame = encode(b"ABC")?;
/// assert_eq!(frame, [0x02, 0x03, b'A', b'B', b'C', 0xC6, 0x03]);
/// # Ok::<(), framewire_core::EncodeError>(())
/// ```
///
/// # Errors
/// Returns `EncodeError::PayloadTooLarge` when the payload does not fit in a
/// single length byte.
pub fn encode(payload: &[u8]) -> Result<Vec<u8>, EncodeError> {
    let mut frame = Vec::with_capacity(frame_len(payload.len()));
    encode_into(payload, &mut frame)?;
    Ok(frame)
}

/// Append a frame around `payload` to `out`.
///
/// `out` is left untouched on error.
pub fn encode_into(payload: &[u8], out: &mut Vec<u8>) -> Result<(), EncodeError> {
    let len = u8::try_from(payload.len()).map_err(|_| EncodeError::PayloadTooLarge {
        len: payload.len(),
        max: layout::MAX_PAYLOAD_LEN,
    })?;

    out.reserve(frame_len(payload.len()));
    out.push(layout::START);
    out.push(len);
    out.extend_from_slice(payload);
    out.push(checksum(payload));
    out.push(layout::END);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{encode, encode_into, frame_len};
    use crate::framing::error::EncodeError;
    use crate::framing::layout;

    #[test]
    fn encode_lays_out_fields() {
        let frame = encode(&[0xAA, 0xBB]).unwrap();
        assert_eq!(frame.len(), frame_len(2));
        assert_eq!(frame[layout::START_OFFSET], layout::START);
        assert_eq!(frame[layout::LENGTH_OFFSET], 2);
        assert_eq!(&frame[layout::PAYLOAD_OFFSET..layout::checksum_offset(2)], &[0xAA, 0xBB]);
        assert_eq!(frame[layout::checksum_offset(2)], 0x65);
        assert_eq!(frame[layout::end_offset(2)], layout::END);
    }

    #[test]
    fn encode_empty_payload() {
        assert_eq!(encode(&[]).unwrap(), vec![0x02, 0x00, 0x00, 0x03]);
    }

    #[test]
    fn encode_max_payload() {
        let payload = vec![0x01; layout::MAX_PAYLOAD_LEN];
        let frame = encode(&payload).unwrap();
        assert_eq!(frame.len(), layout::MAX_FRAME_LEN);
        assert_eq!(frame[layout::LENGTH_OFFSET], 0xFF);
        assert_eq!(frame[layout::checksum_offset(payload.len())], 0xFF);
    }

    #[test]
    fn encode_rejects_oversized_payload() {
        let err = encode(&[0u8; 256]).unwrap_err();
        assert_eq!(err, EncodeError::PayloadTooLarge { len: 256, max: 255 });
        assert!(err.to_string().contains("payload too large"));
    }

    #[test]
    fn encode_into_appends_and_keeps_buffer_on_error() {
        let mut out = vec![0xEE];
        encode_into(&[0x01], &mut out).unwrap();
        assert_eq!(out, vec![0xEE, 0x02, 0x01, 0x01, 0x01, 0x03]);

        let before = out.clone();
        assert!(encode_into(&[0u8; 300], &mut out).is_err());
        assert_eq!(out, before);
    }
}
