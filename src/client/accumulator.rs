//! Client-side accumulation buffer for batched playback writes.

use crate::format;

/// Bounded byte buffer that collects socket chunks until enough audio is
/// resident for one batched playback write.
///
/// The resident byte count never exceeds the capacity: the flush threshold
/// sits one whole socket chunk below it, and a flush empties the buffer.
#[derive(Debug)]
pub struct AccumulationBuffer {
    data: Vec<u8>,
    capacity: usize,
    flush_threshold: usize,
}

impl Default for AccumulationBuffer {
    fn default() -> Self {
        Self::new(format::ACCUMULATOR_CAPACITY, format::SOCKET_CHUNK_SIZE)
    }
}

impl AccumulationBuffer {
    /// Create a buffer of `capacity` bytes fed by chunks of at most
    /// `chunk_capacity` bytes.
    ///
    /// # Panics
    ///
    /// Panics unless `capacity > chunk_capacity`, since the flush threshold
    /// must leave room for one whole chunk.
    pub fn new(capacity: usize, chunk_capacity: usize) -> Self {
        assert!(
            capacity > chunk_capacity,
            "capacity must exceed the socket chunk capacity"
        );
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            flush_threshold: capacity - chunk_capacity,
        }
    }

    /// Resident size above which the next append triggers a flush.
    pub fn flush_threshold(&self) -> usize {
        self.flush_threshold
    }

    /// Bytes currently resident.
    pub fn resident(&self) -> usize {
        self.data.len()
    }

    /// Append one socket chunk of at most the configured chunk capacity.
    ///
    /// Returns the entire buffer, truncated to a frame-aligned length, once
    /// the resident size exceeds the flush threshold; the buffer is empty
    /// afterwards.
    pub fn push(&mut self, chunk: &[u8]) -> Option<Vec<u8>> {
        debug_assert!(
            chunk.len() <= self.capacity - self.flush_threshold,
            "chunk larger than the configured socket chunk capacity"
        );
        self.data.extend_from_slice(chunk);
        if self.data.len() > self.flush_threshold {
            self.take()
        } else {
            None
        }
    }

    /// Flush whatever is resident, frame-truncated: the best-effort final
    /// write at end of stream.
    pub fn finish(&mut self) -> Option<Vec<u8>> {
        self.take()
    }

    fn take(&mut self) -> Option<Vec<u8>> {
        let aligned = format::frame_aligned(self.data.len());
        if aligned < self.data.len() {
            tracing::trace!(
                dropped = self.data.len() - aligned,
                "discarding partial trailing frame on flush"
            );
        }
        let mut flushed = std::mem::replace(&mut self.data, Vec::with_capacity(self.capacity));
        flushed.truncate(aligned);
        if flushed.is_empty() { None } else { Some(flushed) }
    }
}
