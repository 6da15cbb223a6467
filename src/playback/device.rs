//! cpal-backed playback sink.
//!
//! The output stream's callback drains a shared frame queue, substituting
//! silence on underrun. Device faults arrive on cpal's error callback and
//! surface on the next [`PlaybackSink::write`] call, so the recovery policy
//! stays in the caller's hands.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use parking_lot::Mutex;

use super::{PlaybackSink, SinkConfig, SinkError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FaultKind {
    Recoverable,
    Fatal,
}

struct Shared {
    queue: Mutex<VecDeque<f32>>,
    fault: Mutex<Option<(FaultKind, String)>>,
}

/// Playback sink rendering on the default output device via cpal.
pub struct CpalSink {
    config: SinkConfig,
    shared: Arc<Shared>,
    stream: Option<cpal::Stream>,
}

impl CpalSink {
    /// Acquire the default output device and start the output stream.
    pub fn open(config: SinkConfig) -> Result<Self, SinkError> {
        let shared = Arc::new(Shared {
            queue: Mutex::new(VecDeque::with_capacity(config.max_buffered_frames)),
            fault: Mutex::new(None),
        });
        let stream = build_stream(&config, &shared)?;
        Ok(Self {
            config,
            shared,
            stream: Some(stream),
        })
    }

    fn period(&self) -> Duration {
        Duration::from_secs_f64(self.config.period_frames as f64 / f64::from(self.config.sample_rate))
    }

    fn take_fault(&self) -> Option<SinkError> {
        self.shared.fault.lock().take().map(|(kind, details)| match kind {
            FaultKind::Recoverable => SinkError::Recoverable(details),
            FaultKind::Fatal => SinkError::Fatal(details),
        })
    }
}

fn build_stream(config: &SinkConfig, shared: &Arc<Shared>) -> Result<cpal::Stream, SinkError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| SinkError::fatal("no output device available"))?;

    let stream_config = cpal::StreamConfig {
        channels: config.channels,
        sample_rate: cpal::SampleRate(config.sample_rate),
        buffer_size: cpal::BufferSize::Fixed(config.period_frames as u32),
    };

    let data_shared = Arc::clone(shared);
    let fault_shared = Arc::clone(shared);

    let stream = device
        .build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let mut queue = data_shared.queue.lock();
                for slot in data.iter_mut() {
                    *slot = queue.pop_front().unwrap_or(0.0);
                }
            },
            move |err| {
                let kind = match err {
                    cpal::StreamError::DeviceNotAvailable => FaultKind::Fatal,
                    _ => FaultKind::Recoverable,
                };
                *fault_shared.fault.lock() = Some((kind, err.to_string()));
            },
            None,
        )
        .map_err(|e| SinkError::fatal(e.to_string()))?;

    stream.play().map_err(|e| SinkError::fatal(e.to_string()))?;
    Ok(stream)
}

impl PlaybackSink for CpalSink {
    fn write(&mut self, frames: &[f32]) -> Result<usize, SinkError> {
        if let Some(fault) = self.take_fault() {
            return Err(fault);
        }
        if self.stream.is_none() {
            return Err(SinkError::fatal("sink is closed"));
        }

        // Wait for the callback to make room rather than dropping audio;
        // a write may still come up short against the queue bound.
        loop {
            let free = {
                let queue = self.shared.queue.lock();
                self.config.max_buffered_frames.saturating_sub(queue.len())
            };
            if free >= frames.len() || free >= self.config.period_frames {
                let accepted = free.min(frames.len());
                self.shared
                    .queue
                    .lock()
                    .extend(frames[..accepted].iter().copied());
                return Ok(accepted);
            }
            if let Some(fault) = self.take_fault() {
                return Err(fault);
            }
            std::thread::sleep(self.period());
        }
    }

    fn recover(&mut self, error: &SinkError) -> Result<(), SinkError> {
        tracing::info!(%error, "rebuilding playback stream");
        self.stream = None;
        self.shared.fault.lock().take();
        match build_stream(&self.config, &self.shared) {
            Ok(stream) => {
                self.stream = Some(stream);
                Ok(())
            }
            Err(e) => Err(SinkError::RecoveryFailed(e.to_string())),
        }
    }

    fn drain(&mut self) {
        while !self.shared.queue.lock().is_empty() {
            if self.shared.fault.lock().is_some() {
                break;
            }
            std::thread::sleep(self.period());
        }
        // One extra period so the device renders what the callback already took.
        std::thread::sleep(self.period());
    }

    fn close(&mut self) {
        self.stream = None;
        self.shared.queue.lock().clear();
    }
}
