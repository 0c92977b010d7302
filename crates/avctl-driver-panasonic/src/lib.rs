//! Panasonic projector plugin for avctl.
//!
//! Registers under the `panasonicProjector` type name and builds a
//! transport-bound [`PanasonicProjector`] controller from a device record:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use avctl_core::{DeviceRegistry, FrameworkVersion};
//! use avctl_driver_panasonic::PanasonicProjectorFactory;
//!
//! let registry = DeviceRegistry::new(FrameworkVersion::new(2, 0, 0));
//! registry.register(Arc::new(PanasonicProjectorFactory))?;
//! ```
//!
//! The projector's vendor command protocol lives behind the controller and
//! is not part of the construction pipeline.

mod config;
mod controller;
mod factory;

pub use config::PanasonicProjectorConfig;
pub use controller::PanasonicProjector;
pub use factory::PanasonicProjectorFactory;
