//! Device configuration records.
//!
//! The host's device tree is a JSON document; each entry deserializes into a
//! [`DeviceConfig`]. The record is read-only after loading. Its `properties`
//! and `controlMethod` fields stay opaque [`serde_json::Value`]s here: each
//! device type projects `properties` into its own typed struct during a build
//! attempt, and the transport resolver parses `controlMethod` into a
//! [`ControlMethod`]. Keeping both raw means a malformed payload surfaces as
//! a per-device build failure rather than poisoning the whole tree load.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TransportError;

/// One device record from the host's device tree.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConfig {
    /// Opaque identifier, unique across the deployment.
    pub key: String,
    /// Human-readable display name.
    pub name: String,
    /// Type tag used for registry dispatch (case-sensitive).
    #[serde(rename = "type")]
    pub device_type: String,
    /// Device-specific properties payload, validated by the device's factory.
    #[serde(default)]
    pub properties: Value,
    /// Control-method descriptor, consumed by the transport resolver.
    #[serde(default)]
    pub control_method: Option<Value>,
}

/// Parsed control-method descriptor: which transport medium a device uses and
/// how to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ControlMethod {
    /// TCP socket to a network-controlled device.
    Tcp { host: String, port: u16 },
    /// Serial line (RS-232, USB-serial).
    #[serde(rename_all = "camelCase")]
    Serial {
        port: String,
        #[serde(default = "default_baud_rate")]
        baud_rate: u32,
    },
    /// In-memory loopback, for tests and simulation.
    Loopback,
}

fn default_baud_rate() -> u32 {
    9600
}

impl ControlMethod {
    /// Parse a raw descriptor value from a device record.
    pub fn from_value(raw: &Value) -> Result<Self, TransportError> {
        serde_json::from_value(raw.clone())
            .map_err(|e| TransportError::InvalidDescriptor(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_device_record() {
        let config: DeviceConfig = serde_json::from_value(json!({
            "key": "proj1",
            "name": "Main Projector",
            "type": "panasonicProjector",
            "properties": { "model": "PT-X1" },
            "controlMethod": { "kind": "tcp", "host": "10.0.0.5", "port": 1024 }
        }))
        .unwrap();

        assert_eq!(config.key, "proj1");
        assert_eq!(config.device_type, "panasonicProjector");
        let method = ControlMethod::from_value(config.control_method.as_ref().unwrap()).unwrap();
        assert_eq!(
            method,
            ControlMethod::Tcp {
                host: "10.0.0.5".into(),
                port: 1024
            }
        );
    }

    #[test]
    fn properties_and_control_method_are_optional_at_load_time() {
        let config: DeviceConfig = serde_json::from_value(json!({
            "key": "proj2",
            "name": "Spare Projector",
            "type": "panasonicProjector"
        }))
        .unwrap();

        assert!(config.properties.is_null());
        assert!(config.control_method.is_none());
    }

    #[test]
    fn serial_descriptor_defaults_baud_rate() {
        let method =
            ControlMethod::from_value(&json!({ "kind": "serial", "port": "/dev/ttyUSB0" }))
                .unwrap();
        assert_eq!(
            method,
            ControlMethod::Serial {
                port: "/dev/ttyUSB0".into(),
                baud_rate: 9600
            }
        );
    }

    #[test]
    fn unknown_descriptor_kind_is_rejected() {
        let err = ControlMethod::from_value(&json!({ "kind": "telepathy" })).unwrap_err();
        assert!(matches!(err, TransportError::InvalidDescriptor(_)));
    }
}
