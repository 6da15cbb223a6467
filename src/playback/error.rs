//! Error types for playback sinks.

/// Errors reported by a playback sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// A device fault the sink may be able to recover from (underrun,
    /// suspended stream, transient backend error).
    #[error("recoverable playback fault: {0}")]
    Recoverable(String),

    /// The device is gone or the write failed in a way recovery cannot fix.
    #[error("playback device failed: {0}")]
    Fatal(String),

    /// The one-shot recovery attempt itself failed.
    #[error("playback recovery failed: {0}")]
    RecoveryFailed(String),
}

impl SinkError {
    /// Create a recoverable fault.
    pub fn recoverable(details: impl Into<String>) -> Self {
        Self::Recoverable(details.into())
    }

    /// Create a fatal device error.
    pub fn fatal(details: impl Into<String>) -> Self {
        Self::Fatal(details.into())
    }

    /// Whether the caller should attempt the sink's recovery operation.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable(_))
    }
}
