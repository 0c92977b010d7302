//! Device tree loading.
//!
//! The tree is a JSON document listing every device record the host should
//! construct. Loading only checks the envelope (parseable JSON, unique
//! device keys); per-device payloads are validated later by each device's
//! own factory, so one bad record cannot poison the whole tree.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use avctl_core::DeviceConfig;

/// The host's declarative device list.
#[derive(Debug, Deserialize)]
pub struct DeviceTree {
    pub devices: Vec<DeviceConfig>,
}

impl DeviceTree {
    /// Load and envelope-check a device tree file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read device tree {}", path.display()))?;
        let tree: DeviceTree = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse device tree {}", path.display()))?;
        tree.check_unique_keys()?;
        Ok(tree)
    }

    fn check_unique_keys(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for device in &self.devices {
            if !seen.insert(device.key.as_str()) {
                bail!("duplicate device key '{}' in device tree", device.key);
            }
        }
        Ok(())
    }
}
