//! Active stream registry
//!
//! The central tracker for the simulated middleware: which streaming
//! sessions are live, which callback each one is bound to, and which
//! delivery method is in effect.

use std::collections::HashMap;
use std::sync::Arc;

use crate::callback::{CallbackId, CallbackRef};

use super::config::RegistryConfig;
use super::decision::{DecisionSource, ThreadRngDecision};
use super::entry::{DeliveryMethod, SessionSnapshot, StreamEntry, StreamState};

/// Tracks the streaming sessions of a single frontend app
///
/// Single-owner and single-threaded: every operation runs to completion on
/// the caller's thread, with no locking of its own. Hosts that take
/// callbacks on multiple threads wrap the registry in
/// [`SharedRegistry`](crate::shared::SharedRegistry).
pub struct ActiveStreamRegistry {
    /// Per-session state, keyed by service ID
    sessions: HashMap<String, StreamEntry>,

    /// Secondary index: callback identity -> owning service ID
    callback_index: HashMap<CallbackId, String>,

    /// Boolean draw behind the method-selection step
    decider: Box<dyn DecisionSource + Send>,

    /// Configuration
    config: RegistryConfig,
}

impl ActiveStreamRegistry {
    /// Create a registry with default configuration and the thread-RNG draw
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a registry with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self::with_decision_source(config, Box::new(ThreadRngDecision))
    }

    /// Create a registry with a custom decision source
    ///
    /// Used by tests and demos to make the method-selection step
    /// deterministic.
    pub fn with_decision_source(
        config: RegistryConfig,
        decider: Box<dyn DecisionSource + Send>,
    ) -> Self {
        Self {
            sessions: HashMap::new(),
            callback_index: HashMap::new(),
            decider,
            config,
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Streaming state for a service ID
    ///
    /// A session that was never started (or has been disposed) reports
    /// [`StreamState::Stopped`].
    pub fn state_for_service(&self, service_id: &str) -> StreamState {
        self.sessions
            .get(service_id)
            .map_or(StreamState::Stopped, |entry| entry.state)
    }

    /// Start tracking a streaming session
    ///
    /// Silently ignored when the service ID is already tracked or the
    /// callback is already bound to another session. On success the
    /// callback receives one state update (started) followed by one method
    /// update; if either delivery fails the session is disposed and the
    /// failure is swallowed.
    pub fn start_streaming(&mut self, service_id: &str, callback: CallbackRef) {
        if self.sessions.contains_key(service_id) {
            tracing::warn!(service = %service_id, "Start ignored, session already tracked");
            return;
        }

        let callback_id = CallbackId::of(&callback);
        if let Some(owner) = self.callback_index.get(&callback_id) {
            tracing::warn!(
                service = %service_id,
                bound_to = %owner,
                "Start ignored, callback already in use"
            );
            return;
        }

        self.sessions
            .insert(service_id.to_owned(), StreamEntry::new(Arc::clone(&callback)));
        self.callback_index.insert(callback_id, service_id.to_owned());

        tracing::info!(service = %service_id, "Stream started");

        if let Err(err) = callback.state_updated(StreamState::Started) {
            tracing::warn!(service = %service_id, error = %err, "Callback unreachable, disposing session");
            self.dispose(service_id);
            return;
        }

        self.update_delivery_method(service_id);
    }

    /// Stop a tracked streaming session
    ///
    /// No-op when the service ID is unknown or already stopped. The entry
    /// stays in the registry so the stopped state remains queryable until
    /// [`dispose`](Self::dispose).
    pub fn stop_streaming(&mut self, service_id: &str) {
        let Some(entry) = self.sessions.get_mut(service_id) else {
            return;
        };
        if entry.state == StreamState::Stopped {
            return;
        }

        entry.state = StreamState::Stopped;
        let callback = Arc::clone(entry.callback());

        tracing::info!(service = %service_id, "Stream stopped");

        if let Err(err) = callback.state_updated(StreamState::Stopped) {
            tracing::warn!(service = %service_id, error = %err, "Callback unreachable, disposing session");
            self.dispose(service_id);
        }
    }

    /// Re-evaluate the delivery method of a started session
    ///
    /// Draws a fresh method and notifies the callback when the pick differs
    /// from the current one. Unknown or stopped sessions are left alone;
    /// the method only changes while the stream is started.
    pub fn refresh_delivery_method(&mut self, service_id: &str) {
        match self.sessions.get(service_id) {
            Some(entry) if entry.state == StreamState::Started => {}
            _ => return,
        }
        self.update_delivery_method(service_id);
    }

    /// Drop a session from the registry, releasing its callback
    ///
    /// Idempotent; also invoked internally whenever a notification delivery
    /// fails.
    pub fn dispose(&mut self, service_id: &str) {
        if let Some(entry) = self.sessions.remove(service_id) {
            self.callback_index.remove(&CallbackId::of(entry.callback()));
            tracing::debug!(service = %service_id, "Session disposed");
        }
    }

    /// Number of tracked sessions, started or stopped
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Read-only view of a tracked session
    pub fn snapshot(&self, service_id: &str) -> Option<SessionSnapshot> {
        self.sessions.get(service_id).map(|entry| SessionSnapshot {
            state: entry.state,
            method: entry.method,
            method_assigned: entry.method_assigned,
            uptime: entry.uptime(),
        })
    }

    /// Method-selection step
    ///
    /// The first assignment always notifies, even when the draw reproduces
    /// the unicast default, so a newly started session always observes an
    /// explicit method. Later draws notify only on an actual change.
    fn update_delivery_method(&mut self, service_id: &str) {
        if !self.sessions.contains_key(service_id) {
            return;
        }

        let pick = if self.decider.decide(self.config.unicast_probability) {
            DeliveryMethod::Unicast
        } else {
            DeliveryMethod::Broadcast
        };

        let Some(entry) = self.sessions.get_mut(service_id) else {
            return;
        };
        if pick == entry.method && entry.method_assigned {
            return;
        }

        entry.assign_method(pick);
        let callback = Arc::clone(entry.callback());

        tracing::debug!(service = %service_id, method = %pick, "Delivery method assigned");

        if let Err(err) = callback.method_updated(pick) {
            tracing::warn!(service = %service_id, error = %err, "Callback unreachable, disposing session");
            self.dispose(service_id);
        }
    }
}

impl Default for ActiveStreamRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use super::super::decision::SequenceDecision;
    use super::*;
    use crate::callback::StreamingCallback;
    use crate::error::DeliveryError;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        State(StreamState),
        Method(DeliveryMethod),
    }

    /// Records every delivery; each channel can be made to fail
    #[derive(Default)]
    struct RecordingCallback {
        events: Mutex<Vec<Event>>,
        fail_state: AtomicBool,
        fail_method: AtomicBool,
    }

    impl RecordingCallback {
        fn shared() -> Arc<Self> {
            Arc::new(Self::default())
        }

        fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }

        fn fail_state_updates(&self, fail: bool) {
            self.fail_state.store(fail, Ordering::SeqCst);
        }

        fn fail_method_updates(&self, fail: bool) {
            self.fail_method.store(fail, Ordering::SeqCst);
        }
    }

    impl StreamingCallback for RecordingCallback {
        fn state_updated(&self, state: StreamState) -> Result<(), DeliveryError> {
            if self.fail_state.load(Ordering::SeqCst) {
                return Err(DeliveryError::Disconnected);
            }
            self.events.lock().unwrap().push(Event::State(state));
            Ok(())
        }

        fn method_updated(&self, method: DeliveryMethod) -> Result<(), DeliveryError> {
            if self.fail_method.load(Ordering::SeqCst) {
                return Err(DeliveryError::Disconnected);
            }
            self.events.lock().unwrap().push(Event::Method(method));
            Ok(())
        }
    }

    fn scripted(decisions: &[bool]) -> ActiveStreamRegistry {
        ActiveStreamRegistry::with_decision_source(
            RegistryConfig::default(),
            Box::new(SequenceDecision::new(decisions)),
        )
    }

    #[test]
    fn test_never_started_reports_stopped() {
        let registry = ActiveStreamRegistry::new();

        assert_eq!(registry.state_for_service("urn:svc:1"), StreamState::Stopped);
        assert!(registry.snapshot("urn:svc:1").is_none());
    }

    #[test]
    fn test_start_notifies_state_then_method() {
        let mut registry = scripted(&[false]);
        let cb = RecordingCallback::shared();

        registry.start_streaming("urn:svc:1", cb.clone());

        assert_eq!(registry.state_for_service("urn:svc:1"), StreamState::Started);
        assert_eq!(
            cb.events(),
            vec![
                Event::State(StreamState::Started),
                Event::Method(DeliveryMethod::Broadcast),
            ]
        );

        let snapshot = registry.snapshot("urn:svc:1").unwrap();
        assert_eq!(snapshot.method, DeliveryMethod::Broadcast);
        assert!(snapshot.method_assigned);
    }

    #[test]
    fn test_first_draw_matching_default_still_notifies() {
        // Unicast is the entry default; the first draw must notify anyway.
        let mut registry = scripted(&[true]);
        let cb = RecordingCallback::shared();

        registry.start_streaming("urn:svc:1", cb.clone());

        assert_eq!(
            cb.events(),
            vec![
                Event::State(StreamState::Started),
                Event::Method(DeliveryMethod::Unicast),
            ]
        );
    }

    #[test]
    fn test_duplicate_start_is_ignored() {
        let mut registry = scripted(&[true]);
        let cb_a = RecordingCallback::shared();
        let cb_b = RecordingCallback::shared();

        registry.start_streaming("urn:svc:1", cb_a.clone());
        registry.start_streaming("urn:svc:1", cb_b.clone());

        assert_eq!(registry.session_count(), 1);
        assert_eq!(registry.state_for_service("urn:svc:1"), StreamState::Started);
        assert_eq!(cb_a.events().len(), 2);
        assert!(cb_b.events().is_empty());
    }

    #[test]
    fn test_callback_in_use_is_ignored() {
        let mut registry = scripted(&[true]);
        let cb = RecordingCallback::shared();

        registry.start_streaming("urn:svc:1", cb.clone());
        registry.start_streaming("urn:svc:2", cb.clone());

        assert_eq!(registry.session_count(), 1);
        assert_eq!(registry.state_for_service("urn:svc:2"), StreamState::Stopped);
        assert_eq!(cb.events().len(), 2);
    }

    #[test]
    fn test_stop_notifies_once() {
        let mut registry = scripted(&[true]);
        let cb = RecordingCallback::shared();

        registry.start_streaming("urn:svc:1", cb.clone());
        registry.stop_streaming("urn:svc:1");

        assert_eq!(registry.state_for_service("urn:svc:1"), StreamState::Stopped);
        assert_eq!(
            cb.events().last(),
            Some(&Event::State(StreamState::Stopped))
        );
        let delivered = cb.events().len();

        // Second stop is silent; the entry stays queryable.
        registry.stop_streaming("urn:svc:1");
        assert_eq!(cb.events().len(), delivered);
        assert_eq!(registry.session_count(), 1);
    }

    #[test]
    fn test_stop_unknown_session_is_noop() {
        let mut registry = ActiveStreamRegistry::new();

        registry.stop_streaming("urn:svc:1");
        assert_eq!(registry.session_count(), 0);
    }

    #[test]
    fn test_failed_start_notification_disposes() {
        let mut registry = scripted(&[true]);
        let cb = RecordingCallback::shared();
        cb.fail_state_updates(true);

        registry.start_streaming("urn:svc:1", cb.clone());

        assert_eq!(registry.session_count(), 0);
        assert_eq!(registry.state_for_service("urn:svc:1"), StreamState::Stopped);
        assert!(cb.events().is_empty());

        // Disposal released the callback binding; it can start another session.
        cb.fail_state_updates(false);
        registry.start_streaming("urn:svc:2", cb.clone());
        assert_eq!(registry.state_for_service("urn:svc:2"), StreamState::Started);
    }

    #[test]
    fn test_failed_method_notification_disposes() {
        let mut registry = scripted(&[true]);
        let cb = RecordingCallback::shared();
        cb.fail_method_updates(true);

        registry.start_streaming("urn:svc:1", cb.clone());

        assert_eq!(registry.session_count(), 0);
        assert_eq!(registry.state_for_service("urn:svc:1"), StreamState::Stopped);
        assert_eq!(cb.events(), vec![Event::State(StreamState::Started)]);
    }

    #[test]
    fn test_failed_stop_notification_disposes() {
        let mut registry = scripted(&[true]);
        let cb = RecordingCallback::shared();

        registry.start_streaming("urn:svc:1", cb.clone());
        cb.fail_state_updates(true);
        registry.stop_streaming("urn:svc:1");

        assert_eq!(registry.session_count(), 0);
        assert_eq!(registry.state_for_service("urn:svc:1"), StreamState::Stopped);

        // No further notifications for the disposed session.
        registry.stop_streaming("urn:svc:1");
        registry.refresh_delivery_method("urn:svc:1");
        assert_eq!(cb.events().len(), 2);
    }

    #[test]
    fn test_refresh_notifies_only_on_change() {
        let mut registry = scripted(&[true, true, false]);
        let cb = RecordingCallback::shared();

        registry.start_streaming("urn:svc:1", cb.clone());
        assert_eq!(cb.events().len(), 2);

        // Same pick as the assigned method: nothing delivered.
        registry.refresh_delivery_method("urn:svc:1");
        assert_eq!(cb.events().len(), 2);

        // Pick flips: one method update.
        registry.refresh_delivery_method("urn:svc:1");
        assert_eq!(
            cb.events().last(),
            Some(&Event::Method(DeliveryMethod::Broadcast))
        );
        assert_eq!(cb.events().len(), 3);
    }

    #[test]
    fn test_refresh_ignores_stopped_sessions() {
        let mut registry = scripted(&[true, false]);
        let cb = RecordingCallback::shared();

        registry.start_streaming("urn:svc:1", cb.clone());
        registry.stop_streaming("urn:svc:1");
        let delivered = cb.events().len();

        registry.refresh_delivery_method("urn:svc:1");
        assert_eq!(cb.events().len(), delivered);
    }

    #[test]
    fn test_refresh_ignores_unknown_sessions() {
        let mut registry = scripted(&[false]);

        registry.refresh_delivery_method("urn:svc:1");
        assert_eq!(registry.session_count(), 0);
    }

    #[test]
    fn test_dispose_releases_callback() {
        let mut registry = scripted(&[true, true]);
        let cb = RecordingCallback::shared();

        registry.start_streaming("urn:svc:1", cb.clone());
        registry.dispose("urn:svc:1");

        assert_eq!(registry.session_count(), 0);
        assert_eq!(registry.state_for_service("urn:svc:1"), StreamState::Stopped);

        registry.start_streaming("urn:svc:2", cb.clone());
        assert_eq!(registry.state_for_service("urn:svc:2"), StreamState::Started);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut registry = scripted(&[true]);
        let cb = RecordingCallback::shared();

        registry.start_streaming("urn:svc:1", cb);
        registry.dispose("urn:svc:1");
        registry.dispose("urn:svc:1");

        assert_eq!(registry.session_count(), 0);
    }

    #[test]
    fn test_client_walkthrough() {
        let mut registry = scripted(&[false]);
        let cb_a = RecordingCallback::shared();
        let cb_b = RecordingCallback::shared();

        registry.start_streaming("svc1", cb_a.clone());
        registry.start_streaming("svc1", cb_b.clone());
        registry.stop_streaming("svc1");

        assert_eq!(
            cb_a.events(),
            vec![
                Event::State(StreamState::Started),
                Event::Method(DeliveryMethod::Broadcast),
                Event::State(StreamState::Stopped),
            ]
        );
        assert!(cb_b.events().is_empty());
        assert_eq!(registry.state_for_service("svc1"), StreamState::Stopped);
    }
}
