// Correctness and logic
#![warn(clippy::unit_cmp)]
#![warn(clippy::match_same_arms)]
// Performance-focused
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::map_clone)]
#![warn(clippy::unnecessary_to_owned)]
#![warn(clippy::redundant_clone)]
// Style and idiomatic Rust
#![warn(clippy::needless_return)]
#![warn(clippy::manual_map)]
#![warn(clippy::unwrap_used)]
#![deny(missing_docs)]

//! # pcmcast
//!
//! Streams raw uncompressed PCM audio over plain TCP from a single source to
//! any number of listening endpoints, each of which buffers the stream and
//! renders it through a local playback device.
//!
//! Two halves, mirrored in the module tree:
//!
//! - **Server** ([`server`]): an accept loop with a fixed-capacity,
//!   reject-when-full admission policy. Every admitted connection gets its
//!   own worker and its own independently positioned [`source::AudioSource`];
//!   concurrent clients are unsynchronized re-reads of the same content.
//! - **Client** ([`client`]): a single sequential receive loop that absorbs
//!   network jitter in an accumulation buffer before handing frame-aligned
//!   batches to a [`playback::PlaybackSink`].
//!
//! The wire protocol is deliberately nothing: no handshake, no framing, no
//! negotiation. Both ends agree on the sample format at build time via the
//! constants in [`format`].
//!
//! ```rust,no_run
//! use pcmcast::{BroadcastServer, FilePcmSource, ServerConfig};
//!
//! # async fn serve() -> pcmcast::CastResult<()> {
//! let factory = FilePcmSource::factory("tone.pcm");
//! let server = BroadcastServer::bind(ServerConfig::default(), factory).await?;
//! server.run().await
//! # }
//! ```

pub mod client;
pub mod error;
pub mod format;
pub mod playback;
pub mod server;
pub mod source;

pub use client::{AccumulationBuffer, BufferMode, Receiver, ReceiverConfig};
pub use error::{CastError, CastResult};
pub use playback::{PlaybackSink, SinkConfig, SinkError};
pub use server::{BroadcastServer, ConnectionWorker, ServerConfig};
pub use source::{AudioSource, FilePcmSource, MemorySource, SourceFactory};
