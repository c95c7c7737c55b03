use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::checksum::accumulate;
use super::layout;
use super::verdict::{MalformedKind, Verdict};

/// Position of the decoder inside a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecoderState {
    AwaitingStart,
    AwaitingLength,
    AwaitingPayload,
    AwaitingChecksum,
    AwaitingEnd,
    Done,
    Failed,
}

impl DecoderState {
    const COUNT: usize = 7;

    /// `Done` and `Failed` absorb every further byte until a reset.
    pub fn is_terminal(self) -> bool {
        matches!(self, DecoderState::Done | DecoderState::Failed)
    }

    pub fn describe(self) -> &'static str {
        match self {
            DecoderState::AwaitingStart => "awaiting start marker",
            DecoderState::AwaitingLength => "awaiting length",
            DecoderState::AwaitingPayload => "awaiting payload",
            DecoderState::AwaitingChecksum => "awaiting checksum",
            DecoderState::AwaitingEnd => "awaiting end marker",
            DecoderState::Done => "done",
            DecoderState::Failed => "failed",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Role of a byte given the state it arrives in.
///
/// START and END are the only value-discriminated classes, and only in the
/// state that expects them; length, payload and checksum are positional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    Start,
    Length,
    Payload,
    Checksum,
    End,
    Other,
}

impl ByteClass {
    const COUNT: usize = 6;

    fn index(self) -> usize {
        self as usize
    }
}

pub fn classify(state: DecoderState, byte: u8) -> ByteClass {
    match state {
        DecoderState::AwaitingStart if byte == layout::START => ByteClass::Start,
        DecoderState::AwaitingLength => ByteClass::Length,
        DecoderState::AwaitingPayload => ByteClass::Payload,
        DecoderState::AwaitingChecksum => ByteClass::Checksum,
        DecoderState::AwaitingEnd if byte == layout::END => ByteClass::End,
        _ => ByteClass::Other,
    }
}

/// Default transitions, indexed by `[state][class]`.
///
/// Data-dependent refinements (zero length, last payload byte, checksum
/// comparison, resync) are applied on top of the table in `FrameDecoder::feed`.
const TRANSITIONS: [[DecoderState; ByteClass::COUNT]; DecoderState::COUNT] = {
    use DecoderState::*;
    [
        // Start          Length           Payload          Checksum     End     Other
        [AwaitingLength, Failed, Failed, Failed, Failed, Failed], // AwaitingStart
        [Failed, AwaitingPayload, Failed, Failed, Failed, Failed], // AwaitingLength
        [Failed, Failed, AwaitingPayload, Failed, Failed, Failed], // AwaitingPayload
        [Failed, Failed, Failed, AwaitingEnd, Failed, Failed],     // AwaitingChecksum
        [Failed, Failed, Failed, Failed, Done, Failed],            // AwaitingEnd
        [Done, Done, Done, Done, Done, Done],                      // Done
        [Failed, Failed, Failed, Failed, Failed, Failed],          // Failed
    ]
};

pub fn transition(state: DecoderState, class: ByteClass) -> DecoderState {
    TRANSITIONS[state.index()][class.index()]
}

/// Handling of bytes that arrive while a START marker is expected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Any non-START byte fails the frame.
    #[default]
    Strict,
    /// Bytes before the START marker are skipped.
    Resync,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    #[serde(default)]
    pub sync: SyncMode,
}

/// Byte-at-a-time decoder for a single frame.
///
/// A decoder holds the state of one frame attempt. Once it reaches `Done` or
/// `Failed` it ignores input until [`FrameDecoder::reset`] is called. It never
/// waits on anything: stalled streams stay `Pending` until the caller expires
/// or resets them.
///
/// # Examples
/// ```
/// use framewire_core::{FrameDecoder, Verdict};
///
/// let mut decoder = FrameDecoder::new();
/// for byte in [0x02, 0x02, b'h', b'i', 0xD1, 0x03] {
///     decoder.feed(byte);
/// }
/// assert_eq!(decoder.result(), Verdict::Complete(b"hi".to_vec()));
/// ```
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    config: DecoderConfig,
    state: DecoderState,
    declared_len: u8,
    payload: Vec<u8>,
    checksum: u8,
    skipped: usize,
    verdict: Verdict,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            config,
            state: DecoderState::AwaitingStart,
            declared_len: 0,
            payload: Vec::with_capacity(layout::MAX_PAYLOAD_LEN),
            checksum: 0,
            skipped: 0,
            verdict: Verdict::Pending,
        }
    }

    pub fn config(&self) -> DecoderConfig {
        self.config
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    pub fn declared_len(&self) -> usize {
        usize::from(self.declared_len)
    }

    /// Payload bytes received so far.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Running checksum of the payload bytes received so far.
    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    /// Bytes dropped while resynchronizing on a START marker.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Consume one byte and return the resulting state.
    pub fn feed(&mut self, byte: u8) -> DecoderState {
        let from = self.state;
        if from.is_terminal() {
            return from;
        }

        let class = classify(from, byte);
        let mut next = transition(from, class);

        match (from, class) {
            (DecoderState::AwaitingStart, ByteClass::Other)
                if self.config.sync == SyncMode::Resync =>
            {
                self.skipped += 1;
                next = DecoderState::AwaitingStart;
            }
            (DecoderState::AwaitingLength, ByteClass::Length) => {
                self.declared_len = byte;
                self.payload.clear();
                self.checksum = 0;
                if byte == 0 {
                    next = DecoderState::AwaitingChecksum;
                }
            }
            (DecoderState::AwaitingPayload, ByteClass::Payload) => {
                self.payload.push(byte);
                self.checksum = accumulate(self.checksum, byte);
                if self.payload.len() == self.declared_len() {
                    next = DecoderState::AwaitingChecksum;
                }
            }
            (DecoderState::AwaitingChecksum, ByteClass::Checksum) if byte != self.checksum => {
                next = DecoderState::Failed;
                self.verdict = Verdict::ChecksumMismatch {
                    expected: self.checksum,
                    received: byte,
                };
            }
            _ => {}
        }

        trace!(from = ?from, to = ?next, class = ?class, byte, "frame transition");

        match next {
            DecoderState::Done => {
                self.verdict = Verdict::Complete(self.payload.clone());
            }
            DecoderState::Failed if !self.verdict.is_terminal() => {
                // Only the two marker positions can reject a byte structurally.
                let kind = if from == DecoderState::AwaitingStart {
                    MalformedKind::MissingStart { found: byte }
                } else {
                    MalformedKind::MissingEnd { found: byte }
                };
                self.verdict = Verdict::Malformed(kind);
            }
            _ => {}
        }

        self.state = next;
        if next.is_terminal() {
            debug!(verdict = self.verdict.status(), len = self.payload.len(), "frame finished");
        }
        next
    }

    /// Feed bytes until the decoder reaches a terminal state.
    ///
    /// Returns how many bytes of `bytes` were consumed; bytes after the one
    /// that finished the frame are left untouched.
    pub fn feed_all(&mut self, bytes: &[u8]) -> usize {
        let mut consumed = 0;
        for &byte in bytes {
            if self.state.is_terminal() {
                break;
            }
            self.feed(byte);
            consumed += 1;
        }
        consumed
    }

    /// Return to `AwaitingStart` with an empty payload. The config is kept.
    pub fn reset(&mut self) {
        self.state = DecoderState::AwaitingStart;
        self.declared_len = 0;
        self.payload.clear();
        self.checksum = 0;
        self.skipped = 0;
        self.verdict = Verdict::Pending;
    }

    pub fn result(&self) -> Verdict {
        self.verdict.clone()
    }

    /// Give up on an unfinished frame.
    ///
    /// Intended for callers enforcing their own deadline. A non-terminal
    /// decoder moves to `Failed` with [`MalformedKind::Truncated`]; a terminal
    /// one keeps its verdict.
    pub fn expire(&mut self) -> Verdict {
        if !self.state.is_terminal() {
            let state = self.state;
            debug!(state = ?state, "frame expired");
            self.state = DecoderState::Failed;
            self.verdict = Verdict::Malformed(MalformedKind::Truncated { state });
        }
        self.result()
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a single frame from `bytes` with a strict decoder.
///
/// # Examples
/// ```
/// use framewire_core::{Verdict, decode};
///
/// assert_eq!(decode(&[0x02, 0x00, 0x00, 0x03]), Verdict::Complete(Vec::new()));
/// assert_eq!(decode(&[0x02, 0x01]), Verdict::Pending);
/// ```
pub fn decode(bytes: &[u8]) -> Verdict {
    let mut decoder = FrameDecoder::new();
    decoder.feed_all(bytes);
    decoder.result()
}
