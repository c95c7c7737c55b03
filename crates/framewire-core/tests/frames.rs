use std::thread;

use framewire_core::{
    DecoderConfig, DecoderState, END, FrameDecoder, MAX_PAYLOAD_LEN, MalformedKind, START,
    SyncMode, Verdict, checksum, decode, encode,
};

fn sample_payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i as u8).wrapping_mul(37).wrapping_add(11)).collect()
}

#[test]
fn round_trip_every_length() {
    for len in 0..=MAX_PAYLOAD_LEN {
        let payload = sample_payload(len);
        let frame = encode(&payload).unwrap();
        assert_eq!(decode(&frame), Verdict::Complete(payload), "len {len}");
    }
}

#[test]
fn round_trip_payload_full_of_markers() {
    let payload = [START, END, START, END, 0x00, 0xFF];
    let frame = encode(&payload).unwrap();
    assert_eq!(decode(&frame), Verdict::Complete(payload.to_vec()));
}

#[test]
fn flipping_any_payload_byte_is_a_checksum_mismatch() {
    let payload = sample_payload(32);
    let frame = encode(&payload).unwrap();
    for offset in 2..2 + payload.len() {
        let mut corrupted = frame.clone();
        corrupted[offset] ^= 0xFF;
        let verdict = decode(&corrupted);
        assert!(
            matches!(verdict, Verdict::ChecksumMismatch { .. }),
            "offset {offset}: {verdict:?}"
        );
    }
}

#[test]
fn replacing_start_marker_is_malformed() {
    let mut frame = encode(b"data").unwrap();
    frame[0] = 0x01;
    assert_eq!(
        decode(&frame),
        Verdict::Malformed(MalformedKind::MissingStart { found: 0x01 })
    );
}

#[test]
fn replacing_end_marker_is_malformed_not_complete() {
    let mut frame = encode(b"data").unwrap();
    let last = frame.len() - 1;
    frame[last] = START;
    assert_eq!(
        decode(&frame),
        Verdict::Malformed(MalformedKind::MissingEnd { found: START })
    );
}

#[test]
fn scenario_valid_abc_frame() {
    let bytes = [0x02, 0x03, b'A', b'B', b'C', checksum(b"ABC"), 0x03];
    assert_eq!(bytes[5], 0xC6);
    assert_eq!(decode(&bytes), Verdict::Complete(b"ABC".to_vec()));
}

#[test]
fn scenario_wrong_checksum_byte() {
    let verdict = decode(&[0x02, 0x02, b'X', b'Y', 0x00, 0x03]);
    assert!(matches!(
        verdict,
        Verdict::ChecksumMismatch { received: 0x00, .. }
    ));
}

#[test]
fn scenario_stream_ends_early() {
    let mut decoder = FrameDecoder::new();
    decoder.feed_all(&[0x02, 0x01, b'Z', b'Z']);
    assert_eq!(decoder.result(), Verdict::Pending);
    assert!(!decoder.state().is_terminal());

    // A caller deadline classifies the stalled frame as failed.
    assert!(matches!(
        decoder.expire(),
        Verdict::Malformed(MalformedKind::Truncated { .. })
    ));
}

#[test]
fn empty_payload_round_trip() {
    let frame = encode(&[]).unwrap();
    assert_eq!(decode(&frame), Verdict::Complete(Vec::new()));
}

#[test]
fn terminal_verdict_survives_further_input() {
    let mut decoder = FrameDecoder::new();
    decoder.feed_all(&encode(b"x").unwrap());
    let verdict = decoder.result();
    for byte in 0..=u8::MAX {
        decoder.feed(byte);
    }
    assert_eq!(decoder.result(), verdict);
    assert_eq!(decoder.state(), DecoderState::Done);
}

#[test]
fn decoder_is_reusable_after_reset() {
    let mut decoder = FrameDecoder::new();
    decoder.feed_all(&[0x02, 0x01, 0x01, 0x00, 0x03]);
    assert!(matches!(decoder.result(), Verdict::ChecksumMismatch { .. }));

    decoder.reset();
    decoder.feed_all(&encode(b"again").unwrap());
    assert_eq!(decoder.result(), Verdict::Complete(b"again".to_vec()));
}

#[test]
fn resync_finds_frame_after_noise() {
    let mut stream = vec![0x00, 0x03, 0xFF, 0x10];
    stream.extend(encode(b"ok").unwrap());
    let mut decoder = FrameDecoder::with_config(DecoderConfig {
        sync: SyncMode::Resync,
    });
    decoder.feed_all(&stream);
    assert_eq!(decoder.skipped(), 4);
    assert_eq!(decoder.result(), Verdict::Complete(b"ok".to_vec()));
}

#[test]
fn independent_decoders_run_in_parallel() {
    let handles: Vec<_> = (0..8u8)
        .map(|id| {
            thread::spawn(move || {
                let payload = vec![id; usize::from(id) * 10];
                let mut decoder = FrameDecoder::new();
                for byte in encode(&payload).unwrap() {
                    decoder.feed(byte);
                }
                (payload, decoder.result())
            })
        })
        .collect();

    for handle in handles {
        let (payload, verdict) = handle.join().unwrap();
        assert_eq!(verdict, Verdict::Complete(payload));
    }
}
