//! Scripted walkthrough of the middleware state tracker
//!
//! Run with: cargo run --example session_walkthrough
//!
//! Drives a test-client callback through every path the middleware
//! exercises: start (state update plus initial method), a method re-draw
//! with and without a flip, a stop, and a disconnect-on-failure. Set
//! `RUST_LOG=embms_mw=debug` to watch the registry side as well.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use embms_mw::{
    ActiveStreamRegistry, DeliveryError, DeliveryMethod, RegistryConfig, SequenceDecision,
    StreamState, StreamingCallback,
};

/// Test client that prints every notification and can simulate going away
struct TestClient {
    name: &'static str,
    unreachable: AtomicBool,
}

impl TestClient {
    fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            unreachable: AtomicBool::new(false),
        })
    }

    fn disconnect(&self) {
        self.unreachable.store(true, Ordering::SeqCst);
    }

    fn check_reachable(&self) -> Result<(), DeliveryError> {
        if self.unreachable.load(Ordering::SeqCst) {
            Err(DeliveryError::Disconnected)
        } else {
            Ok(())
        }
    }
}

impl StreamingCallback for TestClient {
    fn state_updated(&self, state: StreamState) -> Result<(), DeliveryError> {
        self.check_reachable()?;
        println!("[{}] state -> {}", self.name, state);
        Ok(())
    }

    fn method_updated(&self, method: DeliveryMethod) -> Result<(), DeliveryError> {
        self.check_reachable()?;
        println!("[{}] method -> {}", self.name, method);
        Ok(())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("embms_mw=info")),
        )
        .init();

    // Scripted draws: unicast on start, an unchanged re-draw, then a flip
    // to broadcast.
    let mut registry = ActiveStreamRegistry::with_decision_source(
        RegistryConfig::default(),
        Box::new(SequenceDecision::new([true, true, false, true])),
    );

    let client_a = TestClient::new("client-a");
    let client_b = TestClient::new("client-b");

    println!("=== start urn:svc:1 ===");
    registry.start_streaming("urn:svc:1", client_a.clone());

    println!("=== duplicate start is ignored ===");
    registry.start_streaming("urn:svc:1", client_b.clone());

    println!("=== re-draw, same method: client hears nothing ===");
    registry.refresh_delivery_method("urn:svc:1");

    println!("=== re-draw, method flips ===");
    registry.refresh_delivery_method("urn:svc:1");

    println!("=== stop urn:svc:1 ===");
    registry.stop_streaming("urn:svc:1");
    println!("urn:svc:1 state: {}", registry.state_for_service("urn:svc:1"));

    println!("=== unreachable client is disposed on start ===");
    client_b.disconnect();
    registry.start_streaming("urn:svc:2", client_b);
    println!("urn:svc:2 state: {}", registry.state_for_service("urn:svc:2"));
    println!("tracked sessions: {}", registry.session_count());
}
