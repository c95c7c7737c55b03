use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::framing::{DecoderConfig, FrameDecoder};
use crate::source::{ByteSource, ReaderSource, SourceError};
use crate::{DecodeReport, VerdictSummary, make_stub_report};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// How a session drives its decoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    #[serde(default)]
    pub config: DecoderConfig,
    /// Treat end of input as the caller deadline and expire an unfinished frame.
    #[serde(default)]
    pub expire_at_eof: bool,
}

pub fn decode_file(path: &Path, options: SessionOptions) -> Result<DecodeReport, SessionError> {
    let source = ReaderSource::open(path)?;
    decode_source(&path.display().to_string(), source, options)
}

/// Decode one frame from `source`.
///
/// Bytes are fed until the decoder reaches a terminal state; anything after
/// that is counted as trailing and not decoded. If the input ends first, the
/// verdict stays pending unless `options.expire_at_eof` is set.
///
/// # Examples
/// ```
/// use framewire_core::{SessionOptions, decode_source};
///
/// let chunks = vec![vec![0x02, 0x01], vec![0x7F, 0x7F, 0x03, 0xAA]];
/// let report = decode_source("mem", chunks.into_iter(), SessionOptions::default())?;
/// assert_eq!(report.verdict.status, "complete");
/// assert_eq!(report.trailing_bytes, 1);
/// # Ok::<(), framewire_core::SessionError>(())
/// ```
pub fn decode_source<S: ByteSource>(
    name: &str,
    mut source: S,
    options: SessionOptions,
) -> Result<DecodeReport, SessionError> {
    let mut decoder = FrameDecoder::with_config(options.config);
    let mut bytes_total = 0u64;
    let mut consumed = 0u64;

    while let Some(chunk) = source.next_chunk()? {
        bytes_total += chunk.len() as u64;
        consumed += decoder.feed_all(&chunk) as u64;
    }

    if options.expire_at_eof {
        decoder.expire();
    }
    let verdict = decoder.result();
    debug!(
        input = name,
        bytes = bytes_total,
        consumed,
        status = verdict.status(),
        "decode session finished"
    );

    let mut report = make_stub_report(name, bytes_total, options);
    report.bytes_consumed = consumed;
    report.bytes_skipped = decoder.skipped() as u64;
    report.trailing_bytes = bytes_total - consumed;
    report.final_state = decoder.state();
    report.verdict = VerdictSummary::from(&verdict);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::{SessionOptions, decode_source};
    use crate::framing::{DecoderConfig, DecoderState, SyncMode};

    fn run(chunks: Vec<Vec<u8>>, options: SessionOptions) -> crate::DecodeReport {
        decode_source("mem", chunks.into_iter(), options).expect("session")
    }

    #[test]
    fn frame_split_across_chunks_completes() {
        let report = run(
            vec![vec![0x02], vec![0x03, b'A'], vec![b'B', b'C', 0xC6], vec![0x03]],
            SessionOptions::default(),
        );
        assert_eq!(report.verdict.status, "complete");
        assert_eq!(report.verdict.payload_hex.as_deref(), Some("414243"));
        assert_eq!(report.bytes_consumed, 7);
        assert_eq!(report.trailing_bytes, 0);
        assert_eq!(report.final_state, DecoderState::Done);
    }

    #[test]
    fn trailing_bytes_are_counted_not_decoded() {
        let report = run(
            vec![vec![0x02, 0x00, 0x00, 0x03, 0x02, 0x00], vec![0x00, 0x03]],
            SessionOptions::default(),
        );
        assert_eq!(report.input.bytes, 8);
        assert_eq!(report.bytes_consumed, 4);
        assert_eq!(report.trailing_bytes, 4);
    }

    #[test]
    fn eof_leaves_frame_pending_by_default() {
        let report = run(vec![vec![0x02, 0x01, b'Z', b'Z']], SessionOptions::default());
        assert_eq!(report.verdict.status, "pending");
        assert_eq!(report.final_state, DecoderState::AwaitingEnd);
    }

    #[test]
    fn eof_expires_frame_when_asked() {
        let options = SessionOptions {
            expire_at_eof: true,
            ..SessionOptions::default()
        };
        let report = run(vec![vec![0x02, 0x01, b'Z', b'Z']], options);
        assert_eq!(report.verdict.status, "malformed");
        assert_eq!(
            report.verdict.reason.as_deref(),
            Some("stream ended while awaiting end marker")
        );
        assert_eq!(report.final_state, DecoderState::Failed);
    }

    #[test]
    fn empty_input_expired_reports_missing_start() {
        let options = SessionOptions {
            expire_at_eof: true,
            ..SessionOptions::default()
        };
        let report = run(Vec::new(), options);
        assert_eq!(
            report.verdict.reason.as_deref(),
            Some("stream ended while awaiting start marker")
        );
    }

    #[test]
    fn resync_reports_skipped_bytes() {
        let options = SessionOptions {
            config: DecoderConfig {
                sync: SyncMode::Resync,
            },
            expire_at_eof: false,
        };
        let report = run(vec![vec![0xFF, 0xFE, 0x02, 0x01, 0x09, 0x09, 0x03]], options);
        assert_eq!(report.bytes_skipped, 2);
        assert_eq!(report.bytes_consumed, 7);
        assert_eq!(report.verdict.payload_hex.as_deref(), Some("09"));
    }
}
