pub const START: u8 = 0x02;
pub const END: u8 = 0x03;

/// Largest payload a single length byte can announce.
pub const MAX_PAYLOAD_LEN: usize = u8::MAX as usize;

pub const START_OFFSET: usize = 0;
pub const LENGTH_OFFSET: usize = 1;
pub const PAYLOAD_OFFSET: usize = 2;

/// START + LENGTH + CHECKSUM + END.
pub const FRAME_OVERHEAD: usize = 4;
pub const MAX_FRAME_LEN: usize = MAX_PAYLOAD_LEN + FRAME_OVERHEAD;

pub const fn checksum_offset(payload_len: usize) -> usize {
    PAYLOAD_OFFSET + payload_len
}

pub const fn end_offset(payload_len: usize) -> usize {
    PAYLOAD_OFFSET + payload_len + 1
}
