//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::ConnectionRegistry;
use crate::service::NotificationService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The process-wide connection registry.
    pub registry: Arc<ConnectionRegistry>,
    /// Notification service publishing through `registry`.
    pub notifications: Arc<NotificationService>,
}

impl AppState {
    /// Builds the state around a single registry instance.
    #[must_use]
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        let notifications = Arc::new(NotificationService::new(Arc::clone(&registry)));
        Self {
            registry,
            notifications,
        }
    }
}
