//! TCP transport for network-controlled devices.

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, info};

use super::{ConnectionState, Transport, CONNECT_TIMEOUT};
use crate::error::TransportError;

/// A connected TCP channel to a device.
pub struct TcpTransport {
    endpoint: String,
    stream: TcpStream,
    state: watch::Sender<ConnectionState>,
}

impl TcpTransport {
    /// Connect to `host:port` within [`CONNECT_TIMEOUT`].
    ///
    /// An empty host is a descriptor error, reported before any socket is
    /// touched.
    pub async fn connect(host: &str, port: u16) -> Result<Self, TransportError> {
        if host.is_empty() {
            return Err(TransportError::InvalidDescriptor(
                "tcp control method has an empty host".into(),
            ));
        }

        let endpoint = format!("{host}:{port}");
        let stream = timeout(CONNECT_TIMEOUT, TcpStream::connect(&endpoint))
            .await
            .map_err(|_| TransportError::ConnectTimeout {
                endpoint: endpoint.clone(),
                timeout_ms: CONNECT_TIMEOUT.as_millis() as u64,
            })?
            .map_err(|source| TransportError::Connect {
                endpoint: endpoint.clone(),
                source,
            })?;

        info!(%endpoint, "connected tcp transport");
        let (state, _) = watch::channel(ConnectionState::Connected);
        Ok(Self {
            endpoint,
            stream,
            state,
        })
    }
}

impl std::fmt::Debug for TcpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpTransport")
            .field("endpoint", &self.endpoint)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        if *self.state.borrow() == ConnectionState::Disconnected {
            return Err(TransportError::Closed);
        }
        self.stream.write_all(bytes).await?;
        Ok(())
    }

    async fn recv(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        if *self.state.borrow() == ConnectionState::Disconnected {
            return Err(TransportError::Closed);
        }
        let n = self.stream.read(buf).await?;
        if n == 0 {
            // Peer hung up.
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
        debug!(endpoint = %self.endpoint, "closing tcp transport");
        self.stream.shutdown().await?;
        Ok(())
    }
}
