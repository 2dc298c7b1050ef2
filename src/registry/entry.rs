//! Session entry and state types
//!
//! This module defines the per-session state stored in the registry.

use std::time::{Duration, Instant};

use crate::callback::CallbackRef;

/// Streaming state of a tracked session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Stream is live; the delivery method may still change
    Started,
    /// Stream has been stopped
    Stopped,
}

impl std::fmt::Display for StreamState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamState::Started => write!(f, "started"),
            StreamState::Stopped => write!(f, "stopped"),
        }
    }
}

/// How a started stream is being delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMethod {
    /// Point-to-point delivery
    Unicast,
    /// One-to-many delivery over the broadcast bearer
    Broadcast,
}

impl std::fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryMethod::Unicast => write!(f, "unicast"),
            DeliveryMethod::Broadcast => write!(f, "broadcast"),
        }
    }
}

/// Entry for a single streaming session in the registry
pub struct StreamEntry {
    /// Notification sink bound to this session
    pub(super) callback: CallbackRef,

    /// Current streaming state
    pub state: StreamState,

    /// Delivery method currently in effect
    pub method: DeliveryMethod,

    /// True once a delivery method has been explicitly assigned
    pub method_assigned: bool,

    /// When the session was started
    pub started_at: Instant,
}

impl StreamEntry {
    /// Create a new entry, started and defaulting to unicast
    pub(super) fn new(callback: CallbackRef) -> Self {
        Self {
            callback,
            state: StreamState::Started,
            method: DeliveryMethod::Unicast,
            method_assigned: false,
            started_at: Instant::now(),
        }
    }

    /// Sink bound to this session
    pub fn callback(&self) -> &CallbackRef {
        &self.callback
    }

    /// Assign a delivery method, marking it as explicitly set
    pub(super) fn assign_method(&mut self, method: DeliveryMethod) {
        self.method = method;
        self.method_assigned = true;
    }

    /// Time since the session was started
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Read-only view of a tracked session
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Current streaming state
    pub state: StreamState,
    /// Delivery method currently in effect
    pub method: DeliveryMethod,
    /// Whether the method has been explicitly assigned yet
    pub method_assigned: bool,
    /// Time since the session was started
    pub uptime: Duration,
}
