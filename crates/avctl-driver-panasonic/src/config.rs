//! Typed properties for the Panasonic projector plugin.

use serde::Deserialize;

use avctl_core::BuildError;

const DEVICE_TYPE: &str = "panasonicProjector";

/// Validated projection of a projector device record's properties payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanasonicProjectorConfig {
    /// Projector model designation (e.g. "PT-X1"). Required.
    pub model: String,

    /// Status poll cadence once the controller is online.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Lamp warmup window after power-on, during which commands are deferred.
    #[serde(default = "default_warmup_time_ms")]
    pub warmup_time_ms: u64,

    /// Lamp cooldown window after power-off.
    #[serde(default = "default_cooldown_time_ms")]
    pub cooldown_time_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    10_000
}

fn default_warmup_time_ms() -> u64 {
    60_000
}

fn default_cooldown_time_ms() -> u64 {
    15_000
}

impl PanasonicProjectorConfig {
    /// Project the raw properties payload into the typed config.
    ///
    /// Pure data transform: no I/O, no side effects, same output for the
    /// same input. A missing, null, or structurally wrong payload is an
    /// expected outcome for misconfigured deployments and comes back as
    /// [`BuildError::InvalidConfiguration`].
    pub fn from_properties(properties: &serde_json::Value) -> Result<Self, BuildError> {
        if properties.is_null() {
            return Err(invalid("properties payload is missing"));
        }
        let config: Self = serde_json::from_value(properties.clone())
            .map_err(|e| invalid(&e.to_string()))?;
        if config.model.trim().is_empty() {
            return Err(invalid("model must not be empty"));
        }
        Ok(config)
    }
}

fn invalid(reason: &str) -> BuildError {
    BuildError::InvalidConfiguration {
        device_type: DEVICE_TYPE.into(),
        reason: reason.to_string(),
    }
}
