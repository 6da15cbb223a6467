//! Audio sources: finite producers of raw interleaved PCM frames.
//!
//! Every admitted connection gets its own source instance, positioned at the
//! start of the content. There is no shared read cursor; concurrent clients
//! are served fully independent re-reads.

pub mod file;
pub mod memory;

#[cfg(test)]
mod tests;

pub use file::FilePcmSource;
pub use memory::MemorySource;

use crate::error::CastResult;

/// A finite source of raw interleaved PCM frames.
pub trait AudioSource: Send {
    /// Read up to `max_frames` frames of raw frame-aligned bytes.
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    fn next_batch(&mut self, max_frames: usize) -> CastResult<Option<Vec<u8>>>;

    /// Total length in frames, when known up front.
    fn total_frames(&self) -> Option<u64> {
        None
    }

    /// Frames delivered so far.
    fn position_frames(&self) -> u64 {
        0
    }
}

/// Opens a fresh, independently positioned source per connection.
pub trait SourceFactory: Send + Sync + 'static {
    /// The source type this factory produces.
    type Source: AudioSource + 'static;

    /// Open a new source positioned at the start of the content.
    fn open(&self) -> CastResult<Self::Source>;
}

impl<S, F> SourceFactory for F
where
    S: AudioSource + 'static,
    F: Fn() -> CastResult<S> + Send + Sync + 'static,
{
    type Source = S;

    fn open(&self) -> CastResult<S> {
        self()
    }
}
