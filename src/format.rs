//! Wire format shared by build-time convention between server and client.
//!
//! There is no negotiation on the wire: both binaries must be built with the
//! same constants or playback will be silently corrupted.

/// Sample rate of the stream in Hz.
pub const SAMPLE_RATE: u32 = 44_100;

/// Channel count of the stream (mono).
pub const CHANNELS: u16 = 1;

/// Bytes per sample (32-bit float).
pub const BYTES_PER_SAMPLE: usize = size_of::<f32>();

/// Bytes per frame: one time-sample across all channels.
pub const FRAME_SIZE: usize = CHANNELS as usize * BYTES_PER_SAMPLE;

/// TCP port the broadcast server listens on.
pub const DEFAULT_PORT: u16 = 8080;

/// Maximum bytes read from the socket in one receive call.
pub const SOCKET_CHUNK_SIZE: usize = 4096;

/// Capacity of the client-side accumulation buffer in bytes.
pub const ACCUMULATOR_CAPACITY: usize = 16384;

/// Frames the server pulls from its source per batch (one socket chunk's worth).
pub const BATCH_FRAMES: usize = SOCKET_CHUNK_SIZE / FRAME_SIZE;

/// Largest multiple of the frame size that fits in `len` bytes.
pub const fn frame_aligned(len: usize) -> usize {
    len - len % FRAME_SIZE
}

/// Reinterpret a frame-aligned byte run as native-endian `f32` frames.
///
/// # Panics
///
/// Panics if `bytes.len()` is not a multiple of [`FRAME_SIZE`]; callers are
/// expected to truncate with [`frame_aligned`] first.
pub fn frames_from_bytes(bytes: &[u8]) -> Vec<f32> {
    debug_assert_eq!(bytes.len() % FRAME_SIZE, 0);
    bytemuck::pod_collect_to_vec(bytes)
}
