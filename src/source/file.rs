//! File-backed PCM source.
//!
//! Reads raw native-endian `f32` samples straight off disk; container
//! parsing and decoding are outside this crate's scope.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};

use crate::error::{CastError, CastResult};
use crate::format::{self, FRAME_SIZE};
use crate::source::{AudioSource, SourceFactory};

/// A raw PCM file served from its beginning, one instance per connection.
#[derive(Debug)]
pub struct FilePcmSource {
    reader: BufReader<File>,
    path: PathBuf,
    total_frames: Option<u64>,
    position: u64,
    exhausted: bool,
}

impl FilePcmSource {
    /// Open `path` for sequential reading.
    ///
    /// Fails with [`CastError::SourceUnavailable`]; fatal to whichever
    /// component performed the open.
    pub fn open(path: impl AsRef<Path>) -> CastResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file =
            File::open(&path).map_err(|source| CastError::source_unavailable(&path, source))?;
        let total_frames = file.metadata().ok().map(|m| m.len() / FRAME_SIZE as u64);
        Ok(Self {
            reader: BufReader::new(file),
            path,
            total_frames,
            position: 0,
            exhausted: false,
        })
    }

    /// Factory serving an independent re-read of `path` per connection.
    pub fn factory(path: impl Into<PathBuf>) -> impl SourceFactory<Source = Self> {
        let path = path.into();
        move || Self::open(&path)
    }

    /// Path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AudioSource for FilePcmSource {
    fn next_batch(&mut self, max_frames: usize) -> CastResult<Option<Vec<u8>>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut batch = vec![0u8; max_frames * FRAME_SIZE];
        let mut filled = 0;
        while filled < batch.len() {
            match self.reader.read(&mut batch[filled..]) {
                Ok(0) => {
                    self.exhausted = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(source) => {
                    return Err(CastError::source_unavailable(&self.path, source));
                }
            }
        }

        let aligned = format::frame_aligned(filled);
        if aligned < filled {
            tracing::debug!(
                path = %self.path.display(),
                dropped = filled - aligned,
                "source ends on a partial frame"
            );
        }
        if aligned == 0 {
            return Ok(None);
        }

        batch.truncate(aligned);
        self.position += (aligned / FRAME_SIZE) as u64;
        Ok(Some(batch))
    }

    fn total_frames(&self) -> Option<u64> {
        self.total_frames
    }

    fn position_frames(&self) -> u64 {
        self.position
    }
}
