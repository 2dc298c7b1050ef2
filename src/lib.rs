//! Simulated eMBMS streaming middleware state tracker
//!
//! `embms-mw` is the in-memory state layer of a test middleware that
//! simulates a broadcast/multicast (eMBMS) streaming service. It tracks
//! which streaming sessions a frontend app has started, pushes state and
//! delivery-method notifications into the app's callback, and re-draws the
//! delivery method at random so a test client exercises its method-change
//! handling.
//!
//! There is no transport here: the registry is a purely in-process object
//! driven by a host service, and callbacks are plain trait objects. A
//! callback delivery failure is treated as the client being gone — the
//! session is disposed and the failure swallowed, never surfaced to the
//! caller.
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//!
//! use embms_mw::{
//!     ActiveStreamRegistry, DeliveryError, DeliveryMethod, StreamState, StreamingCallback,
//! };
//!
//! struct PrintingClient;
//!
//! impl StreamingCallback for PrintingClient {
//!     fn state_updated(&self, state: StreamState) -> Result<(), DeliveryError> {
//!         println!("state -> {}", state);
//!         Ok(())
//!     }
//!
//!     fn method_updated(&self, method: DeliveryMethod) -> Result<(), DeliveryError> {
//!         println!("method -> {}", method);
//!         Ok(())
//!     }
//! }
//!
//! let mut registry = ActiveStreamRegistry::new();
//! registry.start_streaming("urn:svc:news", Arc::new(PrintingClient));
//! assert_eq!(registry.state_for_service("urn:svc:news"), StreamState::Started);
//! registry.stop_streaming("urn:svc:news");
//! assert_eq!(registry.state_for_service("urn:svc:news"), StreamState::Stopped);
//! ```
//!
//! Multi-threaded hosts wrap the registry in [`SharedRegistry`]; hosts that
//! serve several frontend apps hold one registry per app via
//! [`MiddlewareState`].

pub mod callback;
pub mod error;
pub mod registry;
pub mod service;
pub mod shared;

pub use callback::{CallbackRef, StreamingCallback};
pub use error::DeliveryError;
pub use registry::{
    ActiveStreamRegistry, DecisionSource, DeliveryMethod, RegistryConfig, SequenceDecision,
    SessionSnapshot, StreamState, ThreadRngDecision,
};
pub use service::{AppIdentifier, MiddlewareState};
pub use shared::SharedRegistry;
