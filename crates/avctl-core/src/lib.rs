//! Core device-construction protocol for avctl.
//!
//! A host runtime holds one [`config::DeviceConfig`] record per device in its
//! device tree. Each record names a device type; the [`registry::DeviceRegistry`]
//! maps type names to [`factory::DeviceFactory`] implementations registered at
//! startup. Building a device walks a fixed pipeline:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Composition Root (avctl-bin)                │
//! │  registry.register(Arc::new(PanasonicProjectorFactory));    │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       DeviceRegistry                        │
//! │  factories: type name -> Arc<dyn DeviceFactory>             │
//! │  build(): resolve -> version gate -> factory                │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │               DeviceFactory::build_device()                 │
//! │  validate properties -> resolve transport -> controller     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every stage reports failure as a typed [`error::BuildError`]; a
//! misconfigured or unreachable device never aborts the host or its sibling
//! builds.

pub mod config;
pub mod error;
pub mod factory;
pub mod registry;
pub mod transport;
pub mod version;

pub use config::{ControlMethod, DeviceConfig};
pub use error::{BuildError, RegistryError, TransportError};
pub use factory::{BuildResult, DeviceController, DeviceFactory};
pub use registry::DeviceRegistry;
pub use transport::{resolve_transport, ConnectionState, Transport};
pub use version::FrameworkVersion;
