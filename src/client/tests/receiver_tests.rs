//! Receiver loop tests over an in-memory transport.

use tokio::io::AsyncWriteExt;

use super::MockSink;
use crate::client::{BufferMode, Receiver, ReceiverConfig};
use crate::error::CastError;
use crate::format::{FRAME_SIZE, SOCKET_CHUNK_SIZE};
use crate::playback::SinkError;

fn receiver(mode: BufferMode) -> Receiver {
    let config = ReceiverConfig::for_addr("127.0.0.1:8080".parse().unwrap()).with_mode(mode);
    Receiver::new(config)
}

/// Run the receive loop against a byte stream delivered over a duplex pipe.
async fn render_bytes(
    mode: BufferMode,
    payload: Vec<u8>,
    sink: &mut MockSink,
) -> crate::error::CastResult<()> {
    let (mut tx, rx) = tokio::io::duplex(64 * 1024);
    let writer = tokio::spawn(async move {
        tx.write_all(&payload).await.unwrap();
        // Dropping tx closes the pipe: end of stream.
    });
    let result = receiver(mode).render(rx, sink).await;
    writer.await.unwrap();
    result
}

#[tokio::test]
async fn immediate_mode_forwards_whole_frames_and_drops_chunk_remainders() {
    // One full chunk plus a 2-byte tail: the tail is discarded, not carried.
    let payload = vec![0u8; SOCKET_CHUNK_SIZE + 2];
    let mut sink = MockSink::default();

    render_bytes(BufferMode::Immediate, payload, &mut sink)
        .await
        .unwrap();

    let total_frames: usize = sink.writes.iter().map(Vec::len).sum();
    assert_eq!(total_frames, SOCKET_CHUNK_SIZE / FRAME_SIZE);
    assert!(sink.drained);
}

#[tokio::test]
async fn batched_mode_accumulates_then_flushes_residue_at_end_of_stream() {
    // 16384 bytes flush once in full; the remaining 2000 arrive at EOF.
    let payload = vec![0u8; 16384 + 2000];
    let mut sink = MockSink::default();

    render_bytes(BufferMode::Batched, payload, &mut sink)
        .await
        .unwrap();

    let frame_counts: Vec<usize> = sink.writes.iter().map(Vec::len).collect();
    assert_eq!(frame_counts, vec![16384 / FRAME_SIZE, 2000 / FRAME_SIZE]);
    assert!(sink.drained);
}

#[tokio::test]
async fn session_delivers_exactly_frame_count_times_frame_size() {
    let frames = 5000usize;
    let payload = vec![0u8; frames * FRAME_SIZE];
    let mut sink = MockSink::default();

    render_bytes(BufferMode::Batched, payload, &mut sink)
        .await
        .unwrap();

    let total: usize = sink.writes.iter().map(Vec::len).sum();
    assert_eq!(total, frames);
}

#[tokio::test]
async fn recoverable_fault_gets_one_recovery_and_the_session_continues() {
    let payload = vec![0u8; 1024];
    let mut sink = MockSink {
        fault_queue: [SinkError::recoverable("underrun")].into(),
        ..MockSink::default()
    };

    render_bytes(BufferMode::Batched, payload, &mut sink)
        .await
        .unwrap();

    assert_eq!(sink.recover_calls, 1);
    // The faulted batch is dropped, matching the device write contract.
    assert!(sink.writes.is_empty());
    assert!(sink.drained);
}

#[tokio::test]
async fn failed_recovery_is_fatal() {
    let payload = vec![0u8; 1024];
    let mut sink = MockSink {
        fault_queue: [SinkError::recoverable("underrun")].into(),
        recovery_fails: true,
        ..MockSink::default()
    };

    let err = render_bytes(BufferMode::Batched, payload, &mut sink)
        .await
        .unwrap_err();

    assert_eq!(sink.recover_calls, 1);
    assert!(matches!(
        err,
        CastError::Sink(SinkError::RecoveryFailed(_))
    ));
}

#[tokio::test]
async fn fatal_fault_skips_recovery_entirely() {
    let payload = vec![0u8; 1024];
    let mut sink = MockSink {
        fault_queue: [SinkError::fatal("device unplugged")].into(),
        ..MockSink::default()
    };

    let err = render_bytes(BufferMode::Batched, payload, &mut sink)
        .await
        .unwrap_err();

    assert_eq!(sink.recover_calls, 0);
    assert!(matches!(err, CastError::Sink(SinkError::Fatal(_))));
}

#[tokio::test]
async fn short_writes_warn_but_do_not_fail_the_session() {
    let payload = vec![0u8; 2048];
    let mut sink = MockSink {
        accept_at_most: Some(10),
        ..MockSink::default()
    };

    render_bytes(BufferMode::Batched, payload, &mut sink)
        .await
        .unwrap();

    assert!(!sink.writes.is_empty());
    assert!(sink.writes.iter().all(|w| w.len() <= 10));
}
