//! Notification service: the application-facing entry into the registry.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{ConnectionRegistry, Notification, Payload, UserId};
use crate::error::GatewayError;

/// Publishes application events to connected users.
///
/// Stateless coordinator over a shared [`ConnectionRegistry`]. Delivery is
/// fire-and-forget: offline recipients are skipped and the returned counts
/// are informational only.
#[derive(Debug, Clone)]
pub struct NotificationService {
    registry: Arc<ConnectionRegistry>,
}

impl NotificationService {
    /// Creates a new `NotificationService`.
    #[must_use]
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Announces a newly created product to every connected client.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Serialization`] if the event cannot be
    /// encoded.
    pub async fn product_created(
        &self,
        product_id: u64,
        product_name: &str,
    ) -> Result<usize, GatewayError> {
        let event = Notification::new_product(product_id, product_name, Utc::now());
        let delivered = self.registry.broadcast(&event).await?;
        tracing::info!(product_id, product_name, delivered, "broadcast new product");
        Ok(delivered)
    }

    /// Notifies each assignee of a task.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Serialization`] if the event cannot be
    /// encoded.
    pub async fn task_assigned(
        &self,
        task_id: u64,
        title: &str,
        assignees: &[UserId],
    ) -> Result<usize, GatewayError> {
        let event = Notification::task_assigned(task_id, title, Utc::now());
        let delivered = self.registry.push_to_users(assignees, &event).await?;
        tracing::info!(
            task_id,
            assignees = assignees.len(),
            delivered,
            "pushed task assignment"
        );
        Ok(delivered)
    }

    /// Sends a raw payload to one user.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Serialization`] if the payload cannot be
    /// encoded.
    pub async fn send_direct(
        &self,
        user_id: &UserId,
        payload: &Payload,
    ) -> Result<usize, GatewayError> {
        self.registry.send_to_user(user_id, payload).await
    }

    /// Sends a raw payload to every connected client.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Serialization`] if the payload cannot be
    /// encoded.
    pub async fn broadcast(&self, payload: &Payload) -> Result<usize, GatewayError> {
        self.registry.broadcast(payload).await
    }

    /// Sends a raw payload to each listed user.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Serialization`] if the payload cannot be
    /// encoded.
    pub async fn push(
        &self,
        user_ids: &[UserId],
        payload: &Payload,
    ) -> Result<usize, GatewayError> {
        self.registry.push_to_users(user_ids, payload).await
    }
}
