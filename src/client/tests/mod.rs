//! Tests for the client receiver and accumulation buffer.

mod receiver_tests;

use std::collections::VecDeque;

use crate::playback::{PlaybackSink, SinkError};

/// Recording sink with scriptable faults and write limits.
#[derive(Default)]
pub(crate) struct MockSink {
    pub writes: Vec<Vec<f32>>,
    pub fault_queue: VecDeque<SinkError>,
    pub accept_at_most: Option<usize>,
    pub recover_calls: usize,
    pub recovery_fails: bool,
    pub drained: bool,
}

impl PlaybackSink for MockSink {
    fn write(&mut self, frames: &[f32]) -> Result<usize, SinkError> {
        if let Some(fault) = self.fault_queue.pop_front() {
            return Err(fault);
        }
        let accepted = self
            .accept_at_most
            .map_or(frames.len(), |limit| limit.min(frames.len()));
        self.writes.push(frames[..accepted].to_vec());
        Ok(accepted)
    }

    fn recover(&mut self, _error: &SinkError) -> Result<(), SinkError> {
        self.recover_calls += 1;
        if self.recovery_fails {
            Err(SinkError::RecoveryFailed("device still broken".into()))
        } else {
            Ok(())
        }
    }

    fn drain(&mut self) {
        self.drained = true;
    }

    fn close(&mut self) {}
}
