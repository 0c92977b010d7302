//! Device registry: type-name dispatch to registered factories.
//!
//! The registry is an explicit instance constructed once by the composition
//! root and passed by reference to whatever needs device construction; there
//! is no process-global state. Registration happens during startup, before any
//! build; afterwards the factory map is read-mostly and safe for concurrent
//! lookups.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::RwLock;
use tracing::{debug, error, info, warn};

use crate::config::DeviceConfig;
use crate::error::{BuildError, RegistryError};
use crate::factory::{BuildResult, DeviceFactory};
use crate::version::FrameworkVersion;

/// Maps device type names to factories and orchestrates builds.
pub struct DeviceRegistry {
    /// Framework version of the running host, checked against each factory's
    /// declared floor before dispatching a build.
    framework_version: FrameworkVersion,
    factories: RwLock<HashMap<String, Arc<dyn DeviceFactory>>>,
}

impl DeviceRegistry {
    /// Create an empty registry advertising the given framework version.
    pub fn new(framework_version: FrameworkVersion) -> Self {
        Self {
            framework_version,
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// The framework version this registry advertises to factories.
    pub fn framework_version(&self) -> FrameworkVersion {
        self.framework_version
    }

    /// Register a factory under every type name it claims.
    ///
    /// All-or-nothing: if any name is already claimed (or the factory claims
    /// none), nothing is inserted and the registry is left exactly as it was.
    pub fn register(&self, factory: Arc<dyn DeviceFactory>) -> Result<(), RegistryError> {
        let names = factory.type_names();
        if names.is_empty() {
            return Err(RegistryError::NoTypeNames {
                factory: factory.display_name().to_string(),
            });
        }

        let mut factories = self.factories.write();
        for name in names {
            if factories.contains_key(*name) {
                return Err(RegistryError::TypeNameTaken {
                    type_name: (*name).to_string(),
                });
            }
        }
        for name in names {
            factories.insert((*name).to_string(), factory.clone());
        }
        info!(
            factory = %factory.display_name(),
            type_names = ?names,
            min_version = %factory.min_framework_version(),
            "registered device factory"
        );
        Ok(())
    }

    /// Look up the factory for a type name. Case-sensitive exact match;
    /// absence is a configuration condition for the caller, not a fault.
    pub fn resolve(&self, type_name: &str) -> Option<Arc<dyn DeviceFactory>> {
        self.factories.read().get(type_name).cloned()
    }

    /// All registered type names, for diagnostics.
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Build one device from its record.
    ///
    /// Resolves the factory, applies the version gate, then dispatches to the
    /// factory and propagates its result unchanged. A panicking factory is
    /// caught here and converted to [`BuildError::Internal`] so one buggy
    /// device type cannot abort sibling builds.
    pub async fn build(&self, config: &DeviceConfig) -> BuildResult {
        let Some(factory) = self.resolve(&config.device_type) else {
            warn!(
                device_key = %config.key,
                device_type = %config.device_type,
                known = ?self.type_names(),
                "unknown device type"
            );
            return Err(BuildError::UnknownType {
                type_name: config.device_type.clone(),
            });
        };

        let required = factory.min_framework_version();
        if !self.framework_version.satisfies(&required) {
            warn!(
                device_key = %config.key,
                device_type = %config.device_type,
                required = %required,
                running = %self.framework_version,
                "factory requires newer framework"
            );
            return Err(BuildError::VersionIncompatible {
                type_name: config.device_type.clone(),
                required,
                running: self.framework_version,
            });
        }

        debug!(
            device_key = %config.key,
            device_type = %config.device_type,
            factory = %factory.display_name(),
            "dispatching device build"
        );

        match AssertUnwindSafe(factory.build_device(config.clone()))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(payload) => {
                let reason = panic_reason(payload);
                error!(
                    device_key = %config.key,
                    device_type = %config.device_type,
                    %reason,
                    "factory panicked during build"
                );
                Err(BuildError::Internal { reason })
            }
        }
    }
}

fn panic_reason(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "factory panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;

    struct StubFactory {
        names: &'static [&'static str],
        min_version: FrameworkVersion,
    }

    impl DeviceFactory for StubFactory {
        fn type_names(&self) -> &'static [&'static str] {
            self.names
        }

        fn display_name(&self) -> &'static str {
            "Stub"
        }

        fn min_framework_version(&self) -> FrameworkVersion {
            self.min_version
        }

        fn build_device(&self, config: DeviceConfig) -> BoxFuture<'static, BuildResult> {
            Box::pin(async move {
                Err(BuildError::InvalidConfiguration {
                    device_type: config.device_type,
                    reason: "stub".into(),
                })
            })
        }
    }

    fn stub(names: &'static [&'static str]) -> Arc<dyn DeviceFactory> {
        Arc::new(StubFactory {
            names,
            min_version: FrameworkVersion::new(1, 0, 0),
        })
    }

    fn config(device_type: &str) -> DeviceConfig {
        DeviceConfig {
            key: "dev1".into(),
            name: "Device 1".into(),
            device_type: device_type.into(),
            properties: serde_json::Value::Null,
            control_method: None,
        }
    }

    #[test]
    fn register_claims_every_alias() {
        let registry = DeviceRegistry::new(FrameworkVersion::new(2, 0, 0));
        registry.register(stub(&["samsungMdc", "samsungMdcDisplay"])).unwrap();

        assert!(registry.resolve("samsungMdc").is_some());
        assert!(registry.resolve("samsungMdcDisplay").is_some());
        assert!(registry.resolve("SamsungMdc").is_none(), "matching is case-sensitive");
    }

    #[test]
    fn duplicate_registration_leaves_registry_untouched() {
        let registry = DeviceRegistry::new(FrameworkVersion::new(2, 0, 0));
        registry.register(stub(&["a", "b"])).unwrap();

        let err = registry.register(stub(&["b", "c"])).unwrap_err();
        assert_eq!(
            err,
            RegistryError::TypeNameTaken {
                type_name: "b".into()
            }
        );
        // The rejected attempt must not have claimed "c".
        assert!(registry.resolve("c").is_none());
        assert_eq!(registry.type_names(), vec!["a", "b"]);
    }

    #[test]
    fn empty_type_name_list_is_rejected() {
        let registry = DeviceRegistry::new(FrameworkVersion::new(2, 0, 0));
        let err = registry.register(stub(&[])).unwrap_err();
        assert!(matches!(err, RegistryError::NoTypeNames { .. }));
    }

    #[tokio::test]
    async fn unknown_type_yields_typed_failure() {
        let registry = DeviceRegistry::new(FrameworkVersion::new(2, 0, 0));
        let err = registry.build(&config("nec")).await.unwrap_err();
        assert!(matches!(err, BuildError::UnknownType { type_name } if type_name == "nec"));
    }

    #[tokio::test]
    async fn version_gate_rejects_old_framework() {
        let registry = DeviceRegistry::new(FrameworkVersion::new(1, 6, 0));
        registry
            .register(Arc::new(StubFactory {
                names: &["proj"],
                min_version: FrameworkVersion::new(1, 7, 5),
            }))
            .unwrap();

        let err = registry.build(&config("proj")).await.unwrap_err();
        assert!(matches!(err, BuildError::VersionIncompatible { .. }));
    }

    #[tokio::test]
    async fn factory_panic_becomes_internal_failure() {
        struct PanickingFactory;

        impl DeviceFactory for PanickingFactory {
            fn type_names(&self) -> &'static [&'static str] {
                &["broken"]
            }
            fn display_name(&self) -> &'static str {
                "Broken"
            }
            fn min_framework_version(&self) -> FrameworkVersion {
                FrameworkVersion::new(1, 0, 0)
            }
            fn build_device(&self, _config: DeviceConfig) -> BoxFuture<'static, BuildResult> {
                Box::pin(async { panic!("factory bug") })
            }
        }

        let registry = DeviceRegistry::new(FrameworkVersion::new(2, 0, 0));
        registry.register(Arc::new(PanickingFactory)).unwrap();
        registry.register(stub(&["fine"])).unwrap();

        let err = registry.build(&config("broken")).await.unwrap_err();
        assert!(matches!(err, BuildError::Internal { reason } if reason.contains("factory bug")));

        // Sibling device types still build after the panic.
        let err = registry.build(&config("fine")).await.unwrap_err();
        assert!(matches!(err, BuildError::InvalidConfiguration { .. }));
    }
}
