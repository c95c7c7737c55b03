//! STX/ETX frame codec.
//!
//! A frame is `START(0x02) | LENGTH | PAYLOAD | CHECKSUM | END(0x03)` with a
//! one-byte length (payloads up to 255 bytes) and a wrapping 8-bit sum of the
//! payload as checksum. The module is split the same way as the other
//! byte-level layers of this crate:
//! - `layout`: marker values, offsets and size limits (source of truth)
//! - `checksum`: the additive checksum shared by both directions
//! - `decoder`: the table-driven, byte-at-a-time state machine
//! - `encoder`: the pure inverse of a successful decode
//! - `error` / `verdict`: explicit outcomes
//!
//! Nothing here performs I/O or keeps process-wide state; every
//! [`FrameDecoder`] is independent and may live on its own thread.

pub mod checksum;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod hex;
pub mod layout;
pub mod verdict;

pub use checksum::checksum;
pub use decoder::{DecoderConfig, DecoderState, FrameDecoder, SyncMode, decode};
pub use encoder::{encode, encode_into, frame_len};
pub use error::{EncodeError, InputError};
pub use verdict::{MalformedKind, Verdict};
