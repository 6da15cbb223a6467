//! Tests for the file and memory sources.

use std::io::Write;
use std::path::PathBuf;

use crate::format::FRAME_SIZE;
use crate::source::{AudioSource, FilePcmSource, MemorySource, SourceFactory};

fn scratch_file(name: &str, contents: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("pcmcast-{}-{name}", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents).unwrap();
    path
}

fn drain_source(source: &mut impl AudioSource, batch_frames: usize) -> Vec<u8> {
    let mut out = Vec::new();
    while let Some(batch) = source.next_batch(batch_frames).unwrap() {
        assert!(!batch.is_empty());
        assert_eq!(batch.len() % FRAME_SIZE, 0);
        assert!(batch.len() <= batch_frames * FRAME_SIZE);
        out.extend_from_slice(&batch);
    }
    out
}

#[test]
fn memory_source_yields_bounded_frame_aligned_batches() {
    let frames: Vec<f32> = (0..10).map(|i| i as f32).collect();
    let mut source = MemorySource::from_frames(&frames);
    assert_eq!(source.total_frames(), Some(10));

    let first = source.next_batch(4).unwrap().unwrap();
    assert_eq!(first.len(), 4 * FRAME_SIZE);
    assert_eq!(source.position_frames(), 4);

    let rest = drain_source(&mut source, 4);
    assert_eq!(rest.len(), 6 * FRAME_SIZE);
    assert!(source.next_batch(4).unwrap().is_none());
}

#[test]
fn memory_source_truncates_partial_trailing_frame() {
    let source = MemorySource::new(vec![0u8; 10]);
    assert_eq!(source.total_frames(), Some(2));
}

#[test]
fn file_source_streams_entire_file() {
    let content: Vec<u8> = (0..=255u8).cycle().take(9000 * FRAME_SIZE).collect();
    let path = scratch_file("whole-file.pcm", &content);

    let mut source = FilePcmSource::open(&path).unwrap();
    assert_eq!(source.total_frames(), Some(9000));
    let streamed = drain_source(&mut source, 1024);
    assert_eq!(streamed, content);
    assert_eq!(source.position_frames(), 9000);

    std::fs::remove_file(path).ok();
}

#[test]
fn file_source_drops_partial_trailing_frame() {
    let content = vec![7u8; 4 * FRAME_SIZE + 3];
    let path = scratch_file("ragged-file.pcm", &content);

    let mut source = FilePcmSource::open(&path).unwrap();
    let streamed = drain_source(&mut source, 1024);
    assert_eq!(streamed.len(), 4 * FRAME_SIZE);

    std::fs::remove_file(path).ok();
}

#[test]
fn missing_file_is_source_unavailable() {
    let err = FilePcmSource::open("/definitely/not/a/real/path.pcm").unwrap_err();
    assert!(matches!(
        err,
        crate::error::CastError::SourceUnavailable { .. }
    ));
}

#[test]
fn factory_opens_independent_readers() {
    let content = vec![1u8; 16 * FRAME_SIZE];
    let path = scratch_file("factory-file.pcm", &content);

    let factory = FilePcmSource::factory(path.clone());
    let mut a = factory.open().unwrap();
    let mut b = factory.open().unwrap();

    // Advancing one reader must not move the other.
    a.next_batch(8).unwrap().unwrap();
    assert_eq!(b.position_frames(), 0);
    assert_eq!(drain_source(&mut b, 8), content);

    std::fs::remove_file(path).ok();
}
