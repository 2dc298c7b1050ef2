//! Active stream tracking
//!
//! The registry records, per streaming service ID, whether the stream is
//! started or stopped, which notification callback it is bound to, and
//! which delivery method is in effect — re-drawing the method on demand to
//! exercise client-side handling of method-change notifications.
//!
//! # Architecture
//!
//! ```text
//!              ActiveStreamRegistry
//!         ┌───────────────────────────────┐
//!         │ sessions: HashMap<ServiceId,  │
//!         │   StreamEntry {               │
//!         │     callback, state, method,  │
//!         │   }                           │
//!         │ > + callback identity index   │
//!         └───────────────┬───────────────┘
//!                         │
//!                         │ state_updated / method_updated
//!                         ▼
//!                 [StreamingCallback]
//!                    test client
//! ```
//!
//! All notifications are delivered synchronously on the caller's thread. A
//! failed delivery disposes the session; the caller never sees the error.

pub mod config;
pub mod decision;
pub mod entry;
pub mod store;

pub use config::RegistryConfig;
pub use decision::{DecisionSource, SequenceDecision, ThreadRngDecision};
pub use entry::{DeliveryMethod, SessionSnapshot, StreamEntry, StreamState};
pub use store::ActiveStreamRegistry;
