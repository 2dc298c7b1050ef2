//! Shared registry handle
//!
//! [`ActiveStreamRegistry`] is single-threaded and does no locking of its
//! own. Hosts whose callbacks arrive on multiple tasks wrap it in this
//! handle, which serializes every operation through a tokio mutex. Nearly
//! every registry operation mutates, so a plain mutex is used rather than
//! a reader-writer lock.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::callback::CallbackRef;
use crate::registry::{ActiveStreamRegistry, SessionSnapshot, StreamState};

/// Cloneable, task-safe handle around an [`ActiveStreamRegistry`]
#[derive(Clone)]
pub struct SharedRegistry {
    inner: Arc<Mutex<ActiveStreamRegistry>>,
}

impl SharedRegistry {
    /// Wrap a registry for shared access
    pub fn new(registry: ActiveStreamRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Streaming state for a service ID
    pub async fn state_for_service(&self, service_id: &str) -> StreamState {
        self.inner.lock().await.state_for_service(service_id)
    }

    /// Start tracking a streaming session
    pub async fn start_streaming(&self, service_id: &str, callback: CallbackRef) {
        self.inner.lock().await.start_streaming(service_id, callback);
    }

    /// Stop a tracked streaming session
    pub async fn stop_streaming(&self, service_id: &str) {
        self.inner.lock().await.stop_streaming(service_id);
    }

    /// Re-evaluate the delivery method of a started session
    pub async fn refresh_delivery_method(&self, service_id: &str) {
        self.inner.lock().await.refresh_delivery_method(service_id);
    }

    /// Drop a session from the registry
    pub async fn dispose(&self, service_id: &str) {
        self.inner.lock().await.dispose(service_id);
    }

    /// Number of tracked sessions
    pub async fn session_count(&self) -> usize {
        self.inner.lock().await.session_count()
    }

    /// Read-only view of a tracked session
    pub async fn snapshot(&self, service_id: &str) -> Option<SessionSnapshot> {
        self.inner.lock().await.snapshot(service_id)
    }
}

impl Default for SharedRegistry {
    fn default() -> Self {
        Self::new(ActiveStreamRegistry::new())
    }
}

impl From<ActiveStreamRegistry> for SharedRegistry {
    fn from(registry: ActiveStreamRegistry) -> Self {
        Self::new(registry)
    }
}
