//! Playback sink contract and the device-backed implementation.
//!
//! The core pipeline only ever talks to a [`PlaybackSink`]: queue frames,
//! attempt one recovery on a recoverable fault, drain, close. The cpal-backed
//! [`CpalSink`] lives behind the `playback` feature so the library and its
//! tests build without an audio device.

pub mod error;

#[cfg(feature = "playback")]
pub mod device;

pub use error::SinkError;

#[cfg(feature = "playback")]
pub use device::CpalSink;

use crate::format;

/// A sink that renders frame batches on a playback device.
///
/// Implementations report how many frames they accepted; accepting fewer than
/// requested is a short write, which callers log but do not escalate.
pub trait PlaybackSink {
    /// Queue `frames` for rendering, returning how many were accepted.
    fn write(&mut self, frames: &[f32]) -> Result<usize, SinkError>;

    /// Attempt to bring the device back after a recoverable fault.
    fn recover(&mut self, error: &SinkError) -> Result<(), SinkError>;

    /// Block until queued audio has been rendered.
    fn drain(&mut self);

    /// Release the device.
    fn close(&mut self);
}

/// Fixed device configuration. Chosen once at startup; there is no
/// renegotiation with the remote end.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,

    /// Output channel count.
    pub channels: u16,

    /// Device period in frames: granularity of the output callback.
    pub period_frames: usize,

    /// Upper bound on frames queued ahead of the device; writes beyond it
    /// block until the callback makes room.
    pub max_buffered_frames: usize,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            sample_rate: format::SAMPLE_RATE,
            channels: format::CHANNELS,
            period_frames: 512,
            max_buffered_frames: 32_768,
        }
    }
}

impl SinkConfig {
    /// Set the device period in frames.
    pub fn with_period_frames(mut self, period_frames: usize) -> Self {
        self.period_frames = period_frames;
        self
    }

    /// Set the queued-frame upper bound.
    pub fn with_max_buffered_frames(mut self, max_buffered_frames: usize) -> Self {
        self.max_buffered_frames = max_buffered_frames;
        self
    }
}
