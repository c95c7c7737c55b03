use thiserror::Error;

use super::decoder::DecoderState;
use super::layout;

/// Outcome of one frame attempt.
///
/// `Pending` is returned while the decoder has not reached a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Well-formed frame with a valid checksum.
    Complete(Vec<u8>),
    /// Structurally valid frame whose checksum byte disagrees with the payload.
    ChecksumMismatch { expected: u8, received: u8 },
    /// Structural violation.
    Malformed(MalformedKind),
    Pending,
}

impl Verdict {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Verdict::Pending)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Verdict::Complete(_))
    }

    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Verdict::Complete(payload) => Some(payload),
            _ => None,
        }
    }

    /// Stable lowercase label used in reports.
    pub fn status(&self) -> &'static str {
        match self {
            Verdict::Complete(_) => "complete",
            Verdict::ChecksumMismatch { .. } => "checksum_mismatch",
            Verdict::Malformed(_) => "malformed",
            Verdict::Pending => "pending",
        }
    }
}

/// Why a frame was rejected as malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedKind {
    #[error("expected START marker 0x{:02x}, found 0x{found:02x}", layout::START)]
    MissingStart { found: u8 },
    #[error("expected END marker 0x{:02x}, found 0x{found:02x}", layout::END)]
    MissingEnd { found: u8 },
    #[error("stream ended while {}", .state.describe())]
    Truncated { state: DecoderState },
}

#[cfg(test)]
mod tests {
    use super::{MalformedKind, Verdict};
    use crate::framing::decoder::DecoderState;

    #[test]
    fn pending_is_not_terminal() {
        assert!(!Verdict::Pending.is_terminal());
        assert!(Verdict::Malformed(MalformedKind::MissingEnd { found: 0 }).is_terminal());
    }

    #[test]
    fn payload_only_for_complete() {
        assert_eq!(Verdict::Complete(vec![1, 2]).payload(), Some(&[1u8, 2][..]));
        let mismatch = Verdict::ChecksumMismatch {
            expected: 1,
            received: 2,
        };
        assert_eq!(mismatch.payload(), None);
        assert_eq!(mismatch.status(), "checksum_mismatch");
    }

    #[test]
    fn malformed_messages_name_the_marker() {
        let msg = MalformedKind::MissingStart { found: 0x41 }.to_string();
        assert_eq!(msg, "expected START marker 0x02, found 0x41");
        let msg = MalformedKind::Truncated {
            state: DecoderState::AwaitingChecksum,
        }
        .to_string();
        assert!(msg.contains("awaiting checksum"));
    }
}
