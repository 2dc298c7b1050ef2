//! Notification sink boundary
//!
//! The registry pushes state and method changes to its client through this
//! trait. In the real middleware the sink is the binder channel back into
//! the frontend app; in a test harness it is an in-process recorder.

use std::sync::Arc;

use crate::error::DeliveryError;
use crate::registry::{DeliveryMethod, StreamState};

/// Notification sink for a single streaming session
///
/// Both deliveries are synchronous and may fail; the registry treats any
/// failure as the callback channel being gone and disposes the session.
pub trait StreamingCallback {
    /// Deliver a streaming state change
    fn state_updated(&self, state: StreamState) -> Result<(), DeliveryError>;

    /// Deliver a delivery method change
    fn method_updated(&self, method: DeliveryMethod) -> Result<(), DeliveryError>;
}

/// Shared reference to a notification sink
///
/// Sessions are bound to their sink by reference identity: the same
/// allocation cannot back two active sessions at once.
pub type CallbackRef = Arc<dyn StreamingCallback + Send + Sync>;

/// Identity of a callback reference, usable as a map key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CallbackId(usize);

impl CallbackId {
    pub(crate) fn of(callback: &CallbackRef) -> Self {
        Self(Arc::as_ptr(callback) as *const () as usize)
    }
}
