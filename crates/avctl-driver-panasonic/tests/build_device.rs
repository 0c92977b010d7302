//! End-to-end build scenarios for the projector plugin.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::net::TcpListener;
use tokio::time::timeout;

use avctl_core::{
    BuildError, ConnectionState, DeviceConfig, DeviceRegistry, FrameworkVersion, TransportError,
};
use avctl_driver_panasonic::PanasonicProjectorFactory;

fn registry() -> DeviceRegistry {
    let registry = DeviceRegistry::new(FrameworkVersion::new(2, 0, 0));
    registry
        .register(Arc::new(PanasonicProjectorFactory))
        .unwrap();
    registry
}

fn projector_config(properties: serde_json::Value, host: &str, port: u16) -> DeviceConfig {
    serde_json::from_value(json!({
        "key": "proj1",
        "name": "Main Projector",
        "type": "panasonicProjector",
        "properties": properties,
        "controlMethod": { "kind": "tcp", "host": host, "port": port }
    }))
    .unwrap()
}

#[tokio::test]
async fn builds_controller_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let config = projector_config(json!({ "model": "PT-X1" }), "127.0.0.1", port);
    let controller = registry().build(&config).await.unwrap();

    assert_eq!(controller.key(), "proj1");
    assert_eq!(controller.name(), "Main Projector");
    assert_eq!(controller.connection_state(), ConnectionState::Connected);

    // Exactly one connection reached the device.
    timeout(Duration::from_secs(1), listener.accept())
        .await
        .expect("device saw no connection")
        .unwrap();
    assert!(
        timeout(Duration::from_millis(50), listener.accept())
            .await
            .is_err(),
        "more than one connection was opened"
    );

    controller.shutdown().await.unwrap();
    assert_eq!(controller.connection_state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn empty_host_is_transport_unavailable() {
    let config = projector_config(json!({ "model": "PT-X1" }), "", 1024);
    let err = registry().build(&config).await.unwrap_err();
    assert!(matches!(
        err,
        BuildError::TransportUnavailable(TransportError::InvalidDescriptor(_))
    ));
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = projector_config(json!({ "model": "PT-X1" }), "127.0.0.1", port);
    let err = registry().build(&config).await.unwrap_err();
    assert!(matches!(
        err,
        BuildError::TransportUnavailable(TransportError::Connect { .. })
    ));
}

#[tokio::test]
async fn invalid_properties_never_touch_the_network() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    // Required `model` field is missing: validation must fail before the
    // resolver runs, so the listener sees no connection attempt.
    let config = projector_config(json!({}), "127.0.0.1", port);
    let err = registry().build(&config).await.unwrap_err();
    assert!(matches!(err, BuildError::InvalidConfiguration { .. }));

    assert!(
        timeout(Duration::from_millis(100), listener.accept())
            .await
            .is_err(),
        "validation failure must not allocate a transport"
    );
}

#[tokio::test]
async fn missing_control_method_is_transport_unavailable() {
    let config: DeviceConfig = serde_json::from_value(json!({
        "key": "proj1",
        "name": "Main Projector",
        "type": "panasonicProjector",
        "properties": { "model": "PT-X1" }
    }))
    .unwrap();

    let err = registry().build(&config).await.unwrap_err();
    assert!(matches!(
        err,
        BuildError::TransportUnavailable(TransportError::MissingControlMethod)
    ));
}

#[tokio::test]
async fn repeated_failures_leave_the_registry_usable() {
    let registry = registry();

    for _ in 0..5 {
        let config = projector_config(json!({ "model": "PT-X1" }), "", 1024);
        let err = registry.build(&config).await.unwrap_err();
        assert!(matches!(err, BuildError::TransportUnavailable(_)));
    }

    // A well-formed device still builds after a run of failures.
    let config: DeviceConfig = serde_json::from_value(json!({
        "key": "proj2",
        "name": "Lab Projector",
        "type": "panasonicProjector",
        "properties": { "model": "PT-X1" },
        "controlMethod": { "kind": "loopback" }
    }))
    .unwrap();
    let controller = registry.build(&config).await.unwrap();
    assert_eq!(controller.key(), "proj2");
    controller.shutdown().await.unwrap();
}

#[tokio::test]
async fn old_framework_is_version_incompatible() {
    let registry = DeviceRegistry::new(FrameworkVersion::new(1, 6, 0));
    registry
        .register(Arc::new(PanasonicProjectorFactory))
        .unwrap();

    let config = projector_config(json!({ "model": "PT-X1" }), "127.0.0.1", 1024);
    let err = registry.build(&config).await.unwrap_err();
    assert!(matches!(
        err,
        BuildError::VersionIncompatible { required, .. }
            if required == FrameworkVersion::new(1, 7, 5)
    ));
}
