//! Error types
//!
//! Exactly one error kind matters to the registry: a notification that
//! could not be delivered to the bound callback. The registry recovers
//! locally by disposing the session; callers of start/stop never see it.

/// Failure to deliver a notification to a bound callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The receiving side of the callback channel is gone
    Disconnected,
    /// The transport rejected or dropped the notification
    Transport(String),
}

impl std::fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryError::Disconnected => write!(f, "callback channel disconnected"),
            DeliveryError::Transport(reason) => {
                write!(f, "notification transport failed: {}", reason)
            }
        }
    }
}

impl std::error::Error for DeliveryError {}
