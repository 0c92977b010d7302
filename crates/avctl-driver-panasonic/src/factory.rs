//! Factory for the Panasonic projector device type.

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, warn};

use avctl_core::transport::resolve_transport;
use avctl_core::{
    BuildError, BuildResult, DeviceConfig, DeviceController, DeviceFactory, FrameworkVersion,
};

use crate::config::PanasonicProjectorConfig;
use crate::controller::PanasonicProjector;

/// Type names this plugin claims in device trees.
const TYPE_NAMES: &[&str] = &["panasonicProjector"];

/// Oldest framework release the plugin supports.
const MIN_FRAMEWORK_VERSION: FrameworkVersion = FrameworkVersion::new(1, 7, 5);

/// Builds [`PanasonicProjector`] controllers from device records.
pub struct PanasonicProjectorFactory;

impl DeviceFactory for PanasonicProjectorFactory {
    fn type_names(&self) -> &'static [&'static str] {
        TYPE_NAMES
    }

    fn display_name(&self) -> &'static str {
        "Panasonic Projector"
    }

    fn min_framework_version(&self) -> FrameworkVersion {
        MIN_FRAMEWORK_VERSION
    }

    fn build_device(&self, config: DeviceConfig) -> BoxFuture<'static, BuildResult> {
        Box::pin(async move {
            debug!(
                device_key = %config.key,
                device_type = %config.device_type,
                "attempting to create projector from device record"
            );

            // Gate 1: properties. Fails before any transport resource is
            // requested, so a malformed payload never opens a socket.
            let properties = PanasonicProjectorConfig::from_properties(&config.properties)
                .map_err(|error| {
                    warn!(device_key = %config.key, %error, "failed to read projector properties");
                    error
                })?;

            // Gate 2: transport.
            let transport = resolve_transport(&config).await.map_err(|error| {
                warn!(device_key = %config.key, %error, "no control connection for projector");
                BuildError::from(error)
            })?;

            let controller =
                PanasonicProjector::new(config.key, config.name, properties, transport);
            Ok(Arc::new(controller) as Arc<dyn DeviceController>)
        })
    }
}
