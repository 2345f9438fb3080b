//! Real-time channel DTOs: status, raw pushes, and typed notifications.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Payload;

/// Response body for `GET /realtime/status`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RealtimeStatusResponse {
    /// Identities with at least one live connection, sorted.
    pub online_users: Vec<String>,
    /// Number of distinct online identities.
    pub online_user_count: usize,
    /// Total live connections across all identities.
    pub connection_count: usize,
}

/// Request body for `POST /realtime/broadcast` and
/// `POST /realtime/users/{user_id}/messages`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PayloadRequest {
    /// JSON object forwarded verbatim as a text frame.
    #[schema(value_type = Object)]
    pub payload: Payload,
}

/// Request body for `POST /realtime/push`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PushRequest {
    /// Recipient identities.
    pub user_ids: Vec<String>,
    /// JSON object forwarded verbatim as a text frame.
    #[schema(value_type = Object)]
    pub payload: Payload,
}

/// Response body for fan-out operations.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeliveryResponse {
    /// Number of connections that accepted the frame.
    pub delivered: usize,
}

/// Response body for `POST /realtime/users/{user_id}/messages`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DirectDeliveryResponse {
    /// Target identity.
    pub user_id: String,
    /// Number of that user's connections that accepted the frame.
    pub delivered: usize,
}

/// Request body for `POST /notifications/products`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductCreatedRequest {
    /// Identifier of the created product.
    pub product_id: u64,
    /// Name of the created product.
    pub product_name: String,
}

/// Request body for `POST /notifications/tasks`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TaskAssignedRequest {
    /// Identifier of the task.
    pub task_id: u64,
    /// Task title.
    pub title: String,
    /// Identities the task was assigned to.
    pub assignees: Vec<String>,
}
