//! Per-connection streaming worker.

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::{CastError, CastResult};
use crate::source::AudioSource;

/// Streams one source over one transport until exhaustion or error.
///
/// A worker is fully isolated: its failure closes its own socket and nothing
/// else. The source is released when the worker is dropped.
pub struct ConnectionWorker<S: AudioSource> {
    source: S,
    batch_frames: usize,
}

impl<S: AudioSource> ConnectionWorker<S> {
    /// Bind a worker to its own source instance.
    pub fn new(source: S, batch_frames: usize) -> Self {
        Self {
            source,
            batch_frames,
        }
    }

    /// Pump batches until the source is exhausted, then shut the transport
    /// down. Returns the number of payload bytes sent.
    pub async fn run<W: AsyncWrite + Unpin>(mut self, transport: &mut W) -> CastResult<u64> {
        let mut sent_total = 0u64;
        while let Some(batch) = self.source.next_batch(self.batch_frames)? {
            send_all(transport, &batch).await?;
            sent_total += batch.len() as u64;
        }
        transport
            .shutdown()
            .await
            .map_err(|e| CastError::transport("shutdown", e))?;
        Ok(sent_total)
    }
}

/// Write `buf` in full, resuming from the correct offset after any partial
/// write. Not error recovery, just completing the in-progress operation.
pub(crate) async fn send_all<W: AsyncWrite + Unpin>(
    transport: &mut W,
    buf: &[u8],
) -> CastResult<()> {
    let mut sent = 0;
    while sent < buf.len() {
        let n = transport
            .write(&buf[sent..])
            .await
            .map_err(|e| CastError::transport("send", e))?;
        if n == 0 {
            return Err(CastError::transport(
                "send",
                std::io::Error::new(
                    std::io::ErrorKind::WriteZero,
                    "transport accepted no bytes",
                ),
            ));
        }
        sent += n;
    }
    Ok(())
}
