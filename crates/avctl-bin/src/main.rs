//! avctl host entry point.
//!
//! Composition root for the device-control runtime: installs tracing,
//! assembles the device registry, loads the JSON device tree, and builds
//! every device in it. Misconfigured or unreachable devices are reported and
//! skipped, and device population always runs to the end of the tree. The
//! host then parks until interrupted and shuts the built controllers down.
//!
//! # Usage
//!
//! ```bash
//! avctl devices.json
//! RUST_LOG=avctl_core=debug avctl devices.json --framework-version 2.1.0
//! ```

mod device_tree;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};

use avctl_core::{BuildError, DeviceController, DeviceRegistry, FrameworkVersion};
use avctl_driver_panasonic::PanasonicProjectorFactory;

use device_tree::DeviceTree;

#[derive(Parser)]
#[command(name = "avctl", about = "Declarative AV device-control host", long_about = None)]
struct Cli {
    /// Path to the JSON device tree
    config: PathBuf,

    /// Framework version advertised to device factories
    #[arg(long, default_value = "2.0.0")]
    framework_version: FrameworkVersion,
}

/// One device that could not be built, kept for the end-of-population report.
struct BuildFailure {
    key: String,
    name: String,
    device_type: String,
    error: BuildError,
}

/// Build every device in the tree, collecting failures instead of stopping.
async fn build_all(
    registry: &DeviceRegistry,
    tree: &DeviceTree,
) -> (Vec<Arc<dyn DeviceController>>, Vec<BuildFailure>) {
    let mut built = Vec::new();
    let mut failures = Vec::new();

    for config in &tree.devices {
        info!(device_key = %config.key, device_type = %config.device_type, "building device");
        match registry.build(config).await {
            Ok(controller) => {
                info!(device_key = %controller.key(), name = %controller.name(), "device ready");
                built.push(controller);
            }
            Err(error) => {
                error!(
                    device_key = %config.key,
                    device_type = %config.device_type,
                    kind = error.kind(),
                    %error,
                    "device not created"
                );
                failures.push(BuildFailure {
                    key: config.key.clone(),
                    name: config.name.clone(),
                    device_type: config.device_type.clone(),
                    error,
                });
            }
        }
    }

    (built, failures)
}

fn assemble_registry(framework_version: FrameworkVersion) -> Result<DeviceRegistry> {
    let registry = DeviceRegistry::new(framework_version);
    registry.register(Arc::new(PanasonicProjectorFactory))?;
    Ok(registry)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let registry = assemble_registry(cli.framework_version)?;
    let tree = DeviceTree::load(&cli.config)?;

    let (built, failures) = build_all(&registry, &tree).await;
    info!(
        built = built.len(),
        failed = failures.len(),
        framework_version = %registry.framework_version(),
        "device population complete"
    );
    for failure in &failures {
        warn!(
            device_key = %failure.key,
            name = %failure.name,
            device_type = %failure.device_type,
            kind = failure.error.kind(),
            error = %failure.error,
            "device skipped"
        );
    }

    signal::ctrl_c().await?;
    info!("shutting down");
    for controller in &built {
        if let Err(error) = controller.shutdown().await {
            warn!(device_key = %controller.key(), %error, "controller shutdown failed");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn population_continues_past_failing_devices() {
        let registry = assemble_registry(FrameworkVersion::new(2, 0, 0)).unwrap();
        let tree: DeviceTree = serde_json::from_value(json!({
            "devices": [
                { "key": "bad1", "name": "Unknown Display", "type": "necDisplay" },
                { "key": "bad2", "name": "Broken Projector", "type": "panasonicProjector",
                  "properties": {} },
                { "key": "proj1", "name": "Main Projector", "type": "panasonicProjector",
                  "properties": { "model": "PT-X1" },
                  "controlMethod": { "kind": "loopback" } }
            ]
        }))
        .unwrap();

        let (built, failures) = build_all(&registry, &tree).await;

        assert_eq!(built.len(), 1);
        assert_eq!(built[0].key(), "proj1");
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].error.kind(), "unknown_type");
        assert_eq!(failures[1].error.kind(), "invalid_configuration");
    }
}
