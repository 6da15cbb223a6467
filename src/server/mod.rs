//! Broadcast server: accept loop with reject-when-full admission.
//!
//! Capacity is a counting semaphore; the admission check and slot
//! reservation are one atomic `try_acquire`. Each admitted connection gets a
//! spawned worker owning the socket, its permit, and a fresh source, so the
//! slot is returned whenever the worker terminates, for any reason.

pub mod worker;

#[cfg(test)]
mod tests;

pub use worker::ConnectionWorker;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

use crate::error::{CastError, CastResult};
use crate::format;
use crate::source::SourceFactory;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the listening socket binds to.
    pub bind_addr: SocketAddr,

    /// Fixed admission capacity: connections beyond it are closed on accept.
    pub max_clients: usize,

    /// Frames pulled from the source per batch.
    pub batch_frames: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], format::DEFAULT_PORT)),
            max_clients: 10,
            batch_frames: format::BATCH_FRAMES,
        }
    }
}

impl ServerConfig {
    /// Set the bind address.
    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    /// Set the admission capacity.
    pub fn with_max_clients(mut self, max_clients: usize) -> Self {
        self.max_clients = max_clients;
        self
    }

    /// Set the per-batch frame count.
    pub fn with_batch_frames(mut self, batch_frames: usize) -> Self {
        self.batch_frames = batch_frames;
        self
    }
}

/// Serves a finite audio source to every admitted client independently.
pub struct BroadcastServer<F: SourceFactory> {
    listener: TcpListener,
    factory: Arc<F>,
    slots: Arc<Semaphore>,
    max_clients: usize,
    batch_frames: usize,
}

impl<F: SourceFactory> BroadcastServer<F> {
    /// Bind the listening socket.
    pub async fn bind(config: ServerConfig, factory: F) -> CastResult<Self> {
        let listener = TcpListener::bind(config.bind_addr)
            .await
            .map_err(|e| CastError::setup("bind", e))?;
        Ok(Self {
            listener,
            factory: Arc::new(factory),
            slots: Arc::new(Semaphore::new(config.max_clients)),
            max_clients: config.max_clients,
            batch_frames: config.batch_frames,
        })
    }

    /// Address the server is actually listening on.
    pub fn local_addr(&self) -> CastResult<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| CastError::setup("local_addr", e))
    }

    /// Number of clients currently being served.
    pub fn active_clients(&self) -> usize {
        self.max_clients - self.slots.available_permits()
    }

    /// Accept loop. Runs until the process is torn down; returning is
    /// always a setup error.
    pub async fn run(self) -> CastResult<()> {
        tracing::info!(
            addr = %self.local_addr()?,
            capacity = self.max_clients,
            "listening"
        );
        loop {
            let (socket, peer) = self
                .listener
                .accept()
                .await
                .map_err(|e| CastError::setup("accept", e))?;

            match Arc::clone(&self.slots).try_acquire_owned() {
                Ok(permit) => {
                    tracing::info!(%peer, active = self.active_clients(), "client admitted");
                    let factory = Arc::clone(&self.factory);
                    let batch_frames = self.batch_frames;
                    tokio::spawn(async move {
                        // Holding the permit for the worker's whole lifetime
                        // is what returns the slot on any exit path.
                        let _slot = permit;
                        serve_connection(socket, peer, factory, batch_frames).await;
                    });
                }
                Err(_) => {
                    tracing::warn!(%peer, capacity = self.max_clients, "at capacity, rejecting");
                    drop(socket);
                }
            }
        }
    }
}

async fn serve_connection<F: SourceFactory>(
    mut socket: TcpStream,
    peer: SocketAddr,
    factory: Arc<F>,
    batch_frames: usize,
) {
    let source = match factory.open() {
        Ok(source) => source,
        Err(error) => {
            tracing::error!(%peer, %error, "could not open source for connection");
            return;
        }
    };

    let worker = ConnectionWorker::new(source, batch_frames);
    match worker.run(&mut socket).await {
        Ok(bytes_sent) => tracing::info!(%peer, bytes_sent, "stream complete"),
        Err(error) => tracing::warn!(%peer, %error, "worker terminated"),
    }
}
