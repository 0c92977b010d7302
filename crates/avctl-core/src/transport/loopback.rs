//! In-memory loopback transport.
//!
//! Backed by [`tokio::io::duplex`]. The resolver-built form echoes every
//! sent byte back, giving simulated deployments a live bidirectional channel
//! without hardware; tests can instead take the peer end and script both
//! sides of a conversation.

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::sync::watch;

use super::{ConnectionState, Transport};
use crate::error::TransportError;

const BUFFER_SIZE: usize = 4096;

/// An in-memory byte channel standing in for a device connection.
pub struct LoopbackTransport {
    io: DuplexStream,
    state: watch::Sender<ConnectionState>,
}

impl LoopbackTransport {
    /// A self-contained loopback: bytes sent come straight back on `recv`.
    pub fn echo() -> Self {
        let (near, far) = tokio::io::duplex(BUFFER_SIZE);
        let (mut rd, mut wr) = tokio::io::split(far);
        tokio::spawn(async move {
            let _ = tokio::io::copy(&mut rd, &mut wr).await;
        });
        Self::from_stream(near)
    }

    /// A transport plus its raw peer end, for tests that drive the device
    /// side of the conversation themselves.
    pub fn pair() -> (Self, DuplexStream) {
        let (near, far) = tokio::io::duplex(BUFFER_SIZE);
        (Self::from_stream(near), far)
    }

    fn from_stream(io: DuplexStream) -> Self {
        let (state, _) = watch::channel(ConnectionState::Connected);
        Self { io, state }
    }
}

impl std::fmt::Debug for LoopbackTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopbackTransport")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for LoopbackTransport {
    async fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        if *self.state.borrow() == ConnectionState::Disconnected {
            return Err(TransportError::Closed);
        }
        self.io.write_all(bytes).await?;
        Ok(())
    }

    async fn recv(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        if *self.state.borrow() == ConnectionState::Disconnected {
            return Err(TransportError::Closed);
        }
        let n = self.io.read(buf).await?;
        if n == 0 {
            self.state.send_replace(ConnectionState::Disconnected);
        }
        Ok(n)
    }

    fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    fn state_changes(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        if self.state.send_replace(ConnectionState::Disconnected)
            == ConnectionState::Disconnected
        {
            return Ok(());
        }
        self.io.shutdown().await?;
        Ok(())
    }
}
