//! Error types for the device-construction pipeline.
//!
//! Every expected failure is a value, not a panic: a device that cannot be
//! built yields a [`BuildError`] describing which stage rejected it, and the
//! host moves on to the next device. The variants keep the stages
//! distinguishable: a transport that could not be acquired must never look
//! like a properties payload that failed validation.

use thiserror::Error;

use crate::version::FrameworkVersion;

/// Failure to acquire or use a communication transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The device record carries no control-method descriptor at all.
    #[error("device has no control method configured")]
    MissingControlMethod,

    /// The descriptor is present but malformed (unknown kind, missing or
    /// empty connection parameters).
    #[error("malformed control method: {0}")]
    InvalidDescriptor(String),

    /// The endpoint did not answer within the bounded connect window.
    #[error("timed out connecting to {endpoint} after {timeout_ms} ms")]
    ConnectTimeout { endpoint: String, timeout_ms: u64 },

    /// The endpoint refused or the address could not be reached.
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// The serial port could not be opened (missing, busy, permissions).
    #[error("failed to open serial port {port}: {reason}")]
    SerialOpen { port: String, reason: String },

    /// Serial support was not compiled into this binary.
    #[error("serial support not enabled; rebuild with --features serial")]
    SerialFeatureDisabled,

    /// The transport was closed and can no longer carry traffic.
    #[error("transport is closed")]
    Closed,

    /// I/O failure on an established transport.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The explicit "no device produced" outcome of a build attempt.
///
/// `Build` never panics for expected misconfiguration; it returns one of
/// these. The variants are the machine-readable split the diagnostics rely
/// on: callers may match on them, log them, and continue with the next
/// device.
#[derive(Error, Debug)]
pub enum BuildError {
    /// No registered factory claims the configured type name.
    #[error("no factory registered for device type '{type_name}'")]
    UnknownType { type_name: String },

    /// The factory's declared minimum framework version exceeds what the
    /// running host provides.
    #[error("device type '{type_name}' requires framework {required}, but {running} is running")]
    VersionIncompatible {
        type_name: String,
        required: FrameworkVersion,
        running: FrameworkVersion,
    },

    /// The properties payload is missing or failed structural validation.
    #[error("invalid {device_type} configuration: {reason}")]
    InvalidConfiguration { device_type: String, reason: String },

    /// A transport could not be constructed for the control method.
    #[error("transport unavailable: {0}")]
    TransportUnavailable(#[from] TransportError),

    /// An unexpected fault (e.g. a factory bug) was caught at the per-device
    /// boundary and converted into a failure result.
    #[error("internal build fault: {reason}")]
    Internal { reason: String },
}

impl BuildError {
    /// Short stable label for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            BuildError::UnknownType { .. } => "unknown_type",
            BuildError::VersionIncompatible { .. } => "version_incompatible",
            BuildError::InvalidConfiguration { .. } => "invalid_configuration",
            BuildError::TransportUnavailable(_) => "transport_unavailable",
            BuildError::Internal { .. } => "internal",
        }
    }
}

/// Failure to register a factory with the registry.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// Another factory already claims one of the requested type names.
    #[error("device type '{type_name}' is already registered")]
    TypeNameTaken { type_name: String },

    /// The factory declares an empty type-name list.
    #[error("factory '{factory}' declares no type names")]
    NoTypeNames { factory: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_error_display_keeps_stages_distinct() {
        let config = BuildError::InvalidConfiguration {
            device_type: "panasonicProjector".into(),
            reason: "missing field `model`".into(),
        };
        let transport = BuildError::TransportUnavailable(TransportError::InvalidDescriptor(
            "tcp control method has an empty host".into(),
        ));
        assert!(config.to_string().contains("invalid panasonicProjector configuration"));
        assert!(transport.to_string().contains("transport unavailable"));
        assert_ne!(config.kind(), transport.kind());
    }

    #[test]
    fn version_incompatible_names_both_versions() {
        let err = BuildError::VersionIncompatible {
            type_name: "panasonicProjector".into(),
            required: FrameworkVersion::new(1, 7, 5),
            running: FrameworkVersion::new(1, 6, 0),
        };
        let text = err.to_string();
        assert!(text.contains("1.7.5"));
        assert!(text.contains("1.6.0"));
    }
}
