//! framewire core library: STX/ETX framing for raw byte streams.
//!
//! A frame is `START(0x02) | LENGTH | PAYLOAD | CHECKSUM | END(0x03)`, where the
//! checksum is the wrapping 8-bit sum of the payload bytes. The crate offers:
//! - a byte-at-a-time [`FrameDecoder`] driven by a state x byte-class table,
//! - the inverse [`encode`] function,
//! - byte sources and a decode session producing a deterministic
//!   [`DecodeReport`] for tooling.
//!
//! Decoding is synchronous and side-effect free; all I/O is isolated in
//! `source`. The decoder never times out on its own: a caller that wants a
//! deadline calls [`FrameDecoder::expire`] or [`FrameDecoder::reset`].
//!
//! Invariants:
//! - `decode(&encode(p)?) == Verdict::Complete(p)` for every payload up to 255 bytes.
//! - `Done` and `Failed` absorb all input until the decoder is reset.
//! - Report outputs are deterministic and stable across runs.
//!
//! # Examples
//! ```
//! use framewire_core::{Verdict, decode, encode};
//!
//! let frame = encode(b"ping")?;
//! assert_eq!(decode(&frame), Verdict::Complete(b"ping".to_vec()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

pub mod framing;
mod session;
mod source;

pub use framing::hex::{parse_hex, to_hex};
pub use framing::layout::{END, MAX_FRAME_LEN, MAX_PAYLOAD_LEN, START};
pub use framing::{
    DecoderConfig, DecoderState, EncodeError, FrameDecoder, InputError, MalformedKind, SyncMode,
    Verdict, checksum, decode, encode, encode_into, frame_len,
};
pub use session::{SessionError, SessionOptions, decode_file, decode_source};
pub use source::{ByteSource, ReaderSource, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;

/// Outcome of decoding one frame from an input, with stream accounting.
///
/// # Examples
/// ```
/// use framewire_core::{DecoderState, SessionOptions, make_stub_report};
///
/// let report = make_stub_report("frame.bin", 7, SessionOptions::default());
/// assert_eq!(report.report_version, framewire_core::REPORT_VERSION);
/// assert_eq!(report.final_state, DecoderState::AwaitingStart);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// Input metadata.
    pub input: InputInfo,
    /// Options the session ran with.
    pub options: SessionOptions,
    /// Bytes fed to the decoder, up to and including the one that ended the frame.
    pub bytes_consumed: u64,
    /// Bytes dropped while resynchronizing on a START marker.
    pub bytes_skipped: u64,
    /// Bytes left over after the frame finished (not decoded).
    pub trailing_bytes: u64,
    /// Decoder state when the input ran out.
    pub final_state: DecoderState,
    pub verdict: VerdictSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Input metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input name as provided to the session (path, `-`, or `hex`).
    pub name: String,
    /// Total bytes read from the input.
    pub bytes: u64,
}

/// Serializable view of a [`Verdict`].
///
/// # Examples
/// ```
/// use framewire_core::{Verdict, VerdictSummary};
///
/// let summary = VerdictSummary::from(&Verdict::Complete(vec![0x41]));
/// assert_eq!(summary.status, "complete");
/// assert_eq!(summary.payload_hex.as_deref(), Some("41"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictSummary {
    /// `complete`, `checksum_mismatch`, `malformed` or `pending`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_len: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_hex: Option<String>,
    /// Checksum computed over the received payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_checksum: Option<u8>,
    /// Checksum byte found on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_checksum: Option<u8>,
    /// Human-readable failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&Verdict> for VerdictSummary {
    fn from(verdict: &Verdict) -> Self {
        let mut summary = VerdictSummary {
            status: verdict.status().to_string(),
            payload_len: None,
            payload_hex: None,
            expected_checksum: None,
            received_checksum: None,
            reason: None,
        };
        match verdict {
            Verdict::Complete(payload) => {
                summary.payload_len = Some(payload.len());
                summary.payload_hex = Some(to_hex(payload));
            }
            Verdict::ChecksumMismatch { expected, received } => {
                summary.expected_checksum = Some(*expected);
                summary.received_checksum = Some(*received);
                summary.reason = Some(format!(
                    "checksum mismatch: expected 0x{expected:02x}, received 0x{received:02x}"
                ));
            }
            Verdict::Malformed(kind) => {
                summary.reason = Some(kind.to_string());
            }
            Verdict::Pending => {}
        }
        summary
    }
}

/// Build a report with base fields filled and nothing decoded yet.
pub fn make_stub_report(
    input_name: &str,
    input_bytes: u64,
    options: SessionOptions,
) -> DecodeReport {
    DecodeReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "framewire".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: InputInfo {
            name: input_name.to_string(),
            bytes: input_bytes,
        },
        options,
        bytes_consumed: 0,
        bytes_skipped: 0,
        trailing_bytes: 0,
        final_state: DecoderState::AwaitingStart,
        verdict: VerdictSummary::from(&Verdict::Pending),
    }
}
