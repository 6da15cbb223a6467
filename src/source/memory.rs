//! In-memory PCM source, for programmatic serving and tests.

use std::sync::Arc;

use crate::error::CastResult;
use crate::format::{self, FRAME_SIZE};
use crate::source::{AudioSource, SourceFactory};

/// A byte-backed source; content is truncated to whole frames up front.
pub struct MemorySource {
    data: Arc<[u8]>,
    cursor: usize,
}

impl MemorySource {
    /// Create a source over raw frame bytes.
    pub fn new(data: Vec<u8>) -> Self {
        let mut data = data;
        data.truncate(format::frame_aligned(data.len()));
        Self {
            data: data.into(),
            cursor: 0,
        }
    }

    /// Create a source from `f32` frames.
    pub fn from_frames(frames: &[f32]) -> Self {
        Self::new(bytemuck::cast_slice(frames).to_vec())
    }

    /// Factory serving independent re-reads of the same content.
    pub fn factory(data: Vec<u8>) -> impl SourceFactory<Source = Self> {
        let mut data = data;
        data.truncate(format::frame_aligned(data.len()));
        let data: Arc<[u8]> = data.into();
        move || -> CastResult<Self> {
            Ok(Self {
                data: Arc::clone(&data),
                cursor: 0,
            })
        }
    }
}

impl AudioSource for MemorySource {
    fn next_batch(&mut self, max_frames: usize) -> CastResult<Option<Vec<u8>>> {
        let remaining = self.data.len() - self.cursor;
        if remaining == 0 {
            return Ok(None);
        }
        let take = remaining.min(max_frames * FRAME_SIZE);
        let batch = self.data[self.cursor..self.cursor + take].to_vec();
        self.cursor += take;
        Ok(Some(batch))
    }

    fn total_frames(&self) -> Option<u64> {
        Some((self.data.len() / FRAME_SIZE) as u64)
    }

    fn position_frames(&self) -> u64 {
        (self.cursor / FRAME_SIZE) as u64
    }
}
