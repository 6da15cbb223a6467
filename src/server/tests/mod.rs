//! Tests for the broadcast server and connection worker.


use crate::error::CastResult;
use crate::format::FRAME_SIZE;
use crate::source::AudioSource;

/// A source that never runs out; used to keep workers serving while the
/// admission policy is probed.
pub(crate) struct EndlessSource;

impl AudioSource for EndlessSource {
    fn next_batch(&mut self, max_frames: usize) -> CastResult<Option<Vec<u8>>> {
        Ok(Some(vec![0u8; max_frames * FRAME_SIZE]))
    }
}
