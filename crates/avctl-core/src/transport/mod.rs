//! Communication transports.
//!
//! A [`Transport`] is a live bidirectional byte channel to a device,
//! abstracting the physical or network medium behind it. The
//! [`resolve_transport`] entry point inspects only a device record's
//! control-method descriptor and dispatches to the matching constructor;
//! device semantics never leak in here, and adding a new medium means adding
//! a new impl plus one dispatch arm, leaving factories and validators
//! untouched.
//!
//! Acquisition is bounded: every constructor resolves to success or an
//! explicit [`TransportError`] within [`CONNECT_TIMEOUT`]. A transport is
//! exclusively owned by the controller it is handed to; dropping it closes
//! the underlying handle.

pub mod loopback;
#[cfg(feature = "serial")]
pub mod serial;
pub mod tcp;

pub use loopback::LoopbackTransport;
#[cfg(feature = "serial")]
pub use serial::SerialTransport;
pub use tcp::TcpTransport;

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::config::{ControlMethod, DeviceConfig};
use crate::error::TransportError;

/// Bound on transport acquisition (TCP connect, serial open).
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection state of a transport, observable by its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

/// A live bidirectional byte channel to a device.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Send raw bytes to the device.
    async fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Receive raw bytes from the device into `buf`, returning the count.
    /// A return of `0` means the peer closed the channel.
    async fn recv(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// Current connection state.
    fn state(&self) -> ConnectionState;

    /// Subscribe to connection-state changes.
    fn state_changes(&self) -> watch::Receiver<ConnectionState>;

    /// Close the channel and release the underlying resource.
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Construct the transport a device record asks for.
///
/// Fails as a value, never a panic, when the descriptor is missing or
/// malformed, or when the named resource cannot be acquired within the
/// bounded window. All of those are recoverable configuration/environment
/// conditions for the caller.
pub async fn resolve_transport(config: &DeviceConfig) -> Result<Box<dyn Transport>, TransportError> {
    let raw = config
        .control_method
        .as_ref()
        .ok_or(TransportError::MissingControlMethod)?;

    match ControlMethod::from_value(raw)? {
        ControlMethod::Tcp { host, port } => {
            let transport = TcpTransport::connect(&host, port).await?;
            Ok(Box::new(transport))
        }
        ControlMethod::Serial { port, baud_rate } => open_serial(port, baud_rate).await,
        ControlMethod::Loopback => Ok(Box::new(LoopbackTransport::echo())),
    }
}

#[cfg(feature = "serial")]
async fn open_serial(port: String, baud_rate: u32) -> Result<Box<dyn Transport>, TransportError> {
    let transport = SerialTransport::open(&port, baud_rate).await?;
    Ok(Box::new(transport))
}

/// Stub resolver when serial support is disabled, so builds without the
/// tokio-serial dependency still link.
#[cfg(not(feature = "serial"))]
async fn open_serial(_port: String, _baud_rate: u32) -> Result<Box<dyn Transport>, TransportError> {
    Err(TransportError::SerialFeatureDisabled)
}
