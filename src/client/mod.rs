//! Client receiver: socket, accumulation buffer, playback sink.
//!
//! A single sequential loop with no internal concurrency: receive a chunk,
//! buffer or forward it, write to the sink. Bytes reach the sink strictly in
//! network receipt order. Transport errors here are fatal to the whole
//! client; there is no isolation unit smaller than the process.

pub mod accumulator;

#[cfg(test)]
mod tests;

pub use accumulator::AccumulationBuffer;

use std::net::{IpAddr, SocketAddr};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::TcpStream;

use crate::error::{CastError, CastResult};
use crate::format;
use crate::playback::PlaybackSink;

/// How received bytes are handed to the playback sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferMode {
    /// Forward every chunk as it arrives, truncated to whole frames. The
    /// trailing non-frame-aligned bytes of each chunk are discarded, not
    /// carried forward.
    Immediate,

    /// Collect chunks in the accumulation buffer and flush in larger
    /// frame-aligned writes, absorbing network jitter.
    #[default]
    Batched,
}

/// Receiver configuration.
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Address of the broadcast server.
    pub server_addr: SocketAddr,

    /// Buffering strategy.
    pub mode: BufferMode,

    /// Maximum bytes per socket read.
    pub chunk_capacity: usize,

    /// Accumulation buffer capacity (batched mode).
    pub accumulator_capacity: usize,
}

impl ReceiverConfig {
    /// Configuration for a server at `server` on the conventional port.
    pub fn new(server: IpAddr) -> Self {
        Self::for_addr(SocketAddr::new(server, format::DEFAULT_PORT))
    }

    /// Configuration for an explicit server address.
    pub fn for_addr(server_addr: SocketAddr) -> Self {
        Self {
            server_addr,
            mode: BufferMode::default(),
            chunk_capacity: format::SOCKET_CHUNK_SIZE,
            accumulator_capacity: format::ACCUMULATOR_CAPACITY,
        }
    }

    /// Set the buffering strategy.
    pub fn with_mode(mut self, mode: BufferMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Buffers a server's byte stream and renders it through a playback sink.
pub struct Receiver {
    config: ReceiverConfig,
}

impl Receiver {
    /// Create a receiver.
    pub fn new(config: ReceiverConfig) -> Self {
        Self { config }
    }

    /// Connect and render the stream until the server closes it.
    ///
    /// No handshake: received bytes are interpreted directly as interleaved
    /// PCM at the format fixed by convention.
    pub async fn run<K: PlaybackSink>(&self, sink: &mut K) -> CastResult<()> {
        let stream = TcpStream::connect(self.config.server_addr)
            .await
            .map_err(|e| CastError::setup("connect", e))?;
        tracing::info!(server = %self.config.server_addr, mode = ?self.config.mode, "connected");
        self.render(stream, sink).await
    }

    /// Receive loop over an established transport.
    pub(crate) async fn render<R, K>(&self, mut transport: R, sink: &mut K) -> CastResult<()>
    where
        R: AsyncRead + Unpin,
        K: PlaybackSink,
    {
        let mut chunk = vec![0u8; self.config.chunk_capacity];
        match self.config.mode {
            BufferMode::Immediate => loop {
                let n = receive_chunk(&mut transport, &mut chunk).await?;
                if n == 0 {
                    break;
                }
                let aligned = format::frame_aligned(n);
                if aligned < n {
                    tracing::trace!(dropped = n - aligned, "discarding partial trailing frame");
                }
                if aligned > 0 {
                    write_to_sink(sink, &chunk[..aligned])?;
                }
            },
            BufferMode::Batched => {
                let mut accumulator = AccumulationBuffer::new(
                    self.config.accumulator_capacity,
                    self.config.chunk_capacity,
                );
                loop {
                    let n = receive_chunk(&mut transport, &mut chunk).await?;
                    if n == 0 {
                        break;
                    }
                    if let Some(flush) = accumulator.push(&chunk[..n]) {
                        write_to_sink(sink, &flush)?;
                    }
                }
                if let Some(flush) = accumulator.finish() {
                    write_to_sink(sink, &flush)?;
                }
            }
        }
        sink.drain();
        tracing::info!("end of stream");
        Ok(())
    }
}

async fn receive_chunk<R: AsyncRead + Unpin>(
    transport: &mut R,
    chunk: &mut [u8],
) -> CastResult<usize> {
    transport
        .read(chunk)
        .await
        .map_err(|e| CastError::transport("receive", e))
}

/// Route one frame-aligned byte run through the sink.
///
/// Recoverable write faults get exactly one recovery attempt, after which
/// the affected batch is dropped and the session continues; a failed
/// recovery or a fatal fault ends the client. Short writes are warned about,
/// never escalated.
fn write_to_sink<K: PlaybackSink>(sink: &mut K, bytes: &[u8]) -> CastResult<()> {
    let frames = format::frames_from_bytes(bytes);
    match sink.write(&frames) {
        Ok(written) => {
            if written < frames.len() {
                tracing::warn!(expected = frames.len(), written, "short playback write");
            }
            Ok(())
        }
        Err(error) if error.is_recoverable() => {
            tracing::warn!(%error, "recoverable playback fault, attempting recovery");
            sink.recover(&error)?;
            Ok(())
        }
        Err(error) => Err(error.into()),
    }
}
