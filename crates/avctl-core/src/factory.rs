//! Device factory and controller traits.
//!
//! Each device type ships one [`DeviceFactory`]. The factory owns the full
//! build pipeline for its type: validate the properties payload, resolve a
//! transport, assemble the controller. The registry only dispatches; it never
//! inspects payload shape itself.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::config::DeviceConfig;
use crate::error::{BuildError, TransportError};
use crate::transport::ConnectionState;
use crate::version::FrameworkVersion;

/// A constructed, transport-bound device controller.
///
/// Beyond its key, name, and connection state the controller is opaque to
/// this crate; its command surface belongs to the device's own module.
pub trait DeviceController: Send + Sync + std::fmt::Debug {
    /// The unique key from the device record this controller was built from.
    fn key(&self) -> &str;

    /// The display name from the device record.
    fn name(&self) -> &str;

    /// Current state of the controller's transport.
    fn connection_state(&self) -> ConnectionState;

    /// Close the controller's transport and release its resources.
    fn shutdown(&self) -> BoxFuture<'_, Result<(), TransportError>>;
}

/// Outcome of one build attempt: a controller, or an explicit failure with
/// its reason. Never a partially constructed controller.
pub type BuildResult = Result<Arc<dyn DeviceController>, BuildError>;

/// Factory for one device type.
///
/// Factories are registered once at startup and live for the program's
/// lifetime; they hold no per-build mutable state, so the registry may invoke
/// `build_device` concurrently for independent devices.
pub trait DeviceFactory: Send + Sync + 'static {
    /// Type names this factory claims in device records.
    ///
    /// Several aliases may name the same device class; matching is
    /// case-sensitive and exact. Must be non-empty.
    fn type_names(&self) -> &'static [&'static str];

    /// Human-readable name for logs and error messages.
    fn display_name(&self) -> &'static str;

    /// Oldest framework release this factory is compatible with.
    fn min_framework_version(&self) -> FrameworkVersion;

    /// Build a controller from a device record.
    ///
    /// Validates the properties payload first, then resolves a transport,
    /// in that order, so a malformed payload never allocates a socket or
    /// serial handle. Expected misconfiguration comes back as a
    /// [`BuildError`], never a panic.
    fn build_device(&self, config: DeviceConfig) -> BoxFuture<'static, BuildResult>;
}
