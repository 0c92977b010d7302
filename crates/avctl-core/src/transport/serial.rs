//! Serial transport for RS-232 / USB-serial controlled devices.

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::watch;
use tokio::task::spawn_blocking;
use tokio_serial::{DataBits, FlowControl, Parity, SerialPortBuilderExt, SerialStream, StopBits};
use tracing::{debug, info};

use super::{ConnectionState, Transport, CONNECT_TIMEOUT};
use crate::error::TransportError;

/// An open serial line to a device.
pub struct SerialTransport {
    port_path: String,
    stream: SerialStream,
    state: watch::Sender<ConnectionState>,
}

impl SerialTransport {
    /// Open `port_path` at `baud_rate` with 8N1 framing and no flow control.
    ///
    /// The open happens on a blocking thread so port initialization cannot
    /// stall the async runtime.
    pub async fn open(port_path: &str, baud_rate: u32) -> Result<Self, TransportError> {
        if port_path.is_empty() {
            return Err(TransportError::InvalidDescriptor(
                "serial control method has an empty port".into(),
            ));
        }

        let path = port_path.to_string();
        let stream = spawn_blocking(move || {
            tokio_serial::new(&path, baud_rate)
                .data_bits(DataBits::Eight)
                .parity(Parity::None)
                .stop_bits(StopBits::One)
                .flow_control(FlowControl::None)
                .timeout(CONNECT_TIMEOUT)
                .open_native_async()
        })
        .await
        .map_err(|e| TransportError::SerialOpen {
            port: port_path.to_string(),
            reason: e.to_string(),
        })?
        .map_err(|e| TransportError::SerialOpen {
            port: port_path.to_string(),
            reason: e.to_string(),
        })?;

        info!(port = %port_path, baud_rate, "opened serial transport");
        let (state, _) = watch::channel(ConnectionState::Connected);
        Ok(Self {
            port_path: port_path.to_string(),
            stream,
            state,
        })
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("port_path", &self.port_path)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for SerialTransport {
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
        debug!(port = %self.port_path, "closing serial transport");
        self.stream.shutdown().await?;
        Ok(())
    }
}
