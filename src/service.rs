//! Per-app scoping of stream tracking
//!
//! The middleware tracks streams independently for each frontend app; an
//! app is identified by its (uid, app name, subscription ID) tuple.

use std::collections::HashMap;

use crate::registry::{ActiveStreamRegistry, RegistryConfig};

/// Identity of a frontend app talking to the middleware
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppIdentifier {
    /// OS-assigned UID of the app process
    pub uid: u32,
    /// Package name of the app
    pub app_name: String,
    /// Carrier subscription the app is bound to
    pub subscription_id: i32,
}

impl AppIdentifier {
    /// Create a new app identifier
    pub fn new(uid: u32, app_name: impl Into<String>, subscription_id: i32) -> Self {
        Self {
            uid,
            app_name: app_name.into(),
            subscription_id,
        }
    }
}

impl std::fmt::Display for AppIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.uid, self.app_name, self.subscription_id)
    }
}

/// Top-level middleware state: one stream registry per frontend app
pub struct MiddlewareState {
    /// Per-app registries, created lazily
    apps: HashMap<AppIdentifier, ActiveStreamRegistry>,

    /// Configuration inherited by new registries
    config: RegistryConfig,
}

impl MiddlewareState {
    /// Create an empty state with default registry configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty state; per-app registries inherit `config`
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            apps: HashMap::new(),
            config,
        }
    }

    /// Registry for an app, created on first use
    pub fn streams_for(&mut self, app: &AppIdentifier) -> &mut ActiveStreamRegistry {
        if !self.apps.contains_key(app) {
            tracing::info!(app = %app, "Tracking new frontend app");
        }
        let config = self.config.clone();
        self.apps
            .entry(app.clone())
            .or_insert_with(|| ActiveStreamRegistry::with_config(config))
    }

    /// Drop an app and all of its tracked sessions
    pub fn teardown(&mut self, app: &AppIdentifier) {
        if let Some(registry) = self.apps.remove(app) {
            tracing::info!(
                app = %app,
                sessions = registry.session_count(),
                "Frontend app torn down"
            );
        }
    }

    /// Whether the app currently has a registry
    pub fn contains_app(&self, app: &AppIdentifier) -> bool {
        self.apps.contains_key(app)
    }

    /// Number of tracked frontend apps
    pub fn app_count(&self) -> usize {
        self.apps.len()
    }
}

impl Default for MiddlewareState {
    fn default() -> Self {
        Self::new()
    }
}
