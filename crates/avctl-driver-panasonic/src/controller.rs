//! The projector controller instance.

use futures::future::BoxFuture;
use tokio::sync::{watch, Mutex};

use avctl_core::{ConnectionState, DeviceController, Transport, TransportError};

use crate::config::PanasonicProjectorConfig;

/// A projector bound to its communication transport.
///
/// Owns the transport exclusively; the command protocol spoken over it is
/// this crate's concern and stays behind `&self` methods via the interior
/// mutex, so the controller can be shared as `Arc<PanasonicProjector>`.
pub struct PanasonicProjector {
    key: String,
    name: String,
    config: PanasonicProjectorConfig,
    state_rx: watch::Receiver<ConnectionState>,
    transport: Mutex<Box<dyn Transport>>,
}

impl PanasonicProjector {
    pub(crate) fn new(
        key: String,
        name: String,
        config: PanasonicProjectorConfig,
        transport: Box<dyn Transport>,
    ) -> Self {
        let state_rx = transport.state_changes();
        Self {
            key,
            name,
            config,
            state_rx,
            transport: Mutex::new(transport),
        }
    }

    /// The validated configuration this controller was built with.
    pub fn config(&self) -> &PanasonicProjectorConfig {
        &self.config
    }
}

impl std::fmt::Debug for PanasonicProjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanasonicProjector")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("connection_state", &*self.state_rx.borrow())
            .finish_non_exhaustive()
    }
}

impl DeviceController for PanasonicProjector {
    fn key(&self) -> &str {
        &self.key
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn connection_state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    fn shutdown(&self) -> BoxFuture<'_, Result<(), TransportError>> {
        Box::pin(async move { self.transport.lock().await.close().await })
    }
}
