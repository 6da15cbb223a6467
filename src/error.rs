//! Crate-wide error taxonomy.
//!
//! Three classes of failure, matching how they propagate: setup errors are
//! fatal to the owning process, transport errors are fatal to the affected
//! connection (and on the client, to the whole process), and sink errors
//! escalate only after the one-shot recovery attempt fails.

use std::path::PathBuf;

use crate::playback::SinkError;

/// Errors produced by the streaming pipeline.
#[derive(Debug, thiserror::Error)]
pub enum CastError {
    /// Socket creation, bind, listen, accept, or connect failure.
    #[error("setup failed during {operation}: {source}")]
    Setup {
        /// The setup step that failed.
        operation: &'static str,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The audio source could not be opened or read.
    #[error("audio source unavailable: {path}: {source}")]
    SourceUnavailable {
        /// Path of the source that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Partial or failed send/receive on an established connection.
    #[error("transport error during {operation}: {source}")]
    Transport {
        /// The transfer operation that failed.
        operation: &'static str,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A playback write failure that the one-shot recovery did not resolve.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl CastError {
    /// Create a setup error for the given step.
    pub fn setup(operation: &'static str, source: std::io::Error) -> Self {
        Self::Setup { operation, source }
    }

    /// Create a transport error for the given transfer operation.
    pub fn transport(operation: &'static str, source: std::io::Error) -> Self {
        Self::Transport { operation, source }
    }

    /// Create a source-unavailable error for `path`.
    pub fn source_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            source,
        }
    }
}

/// Result type for streaming operations.
pub type CastResult<T> = Result<T, CastError>;
