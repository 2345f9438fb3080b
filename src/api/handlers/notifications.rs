//! Typed notification endpoints used by the task and product services.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use super::realtime::parse_user_ids;
use crate::api::dto::{DeliveryResponse, ProductCreatedRequest, TaskAssignedRequest};
use crate::app_state::AppState;
use crate::error::GatewayError;

/// `POST /notifications/products` — Announce a new product to everyone.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/products",
    tag = "Notifications",
    summary = "Announce a new product",
    request_body = ProductCreatedRequest,
    responses(
        (status = 200, description = "Broadcast attempted", body = DeliveryResponse),
        (status = 400, description = "Blank product name"),
    )
)]
pub async fn product_created(
    State(state): State<AppState>,
    Json(req): Json<ProductCreatedRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    if req.product_name.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "product_name must not be empty".to_string(),
        ));
    }
    let delivered = state
        .notifications
        .product_created(req.product_id, &req.product_name)
        .await?;
    Ok(Json(DeliveryResponse { delivered }))
}

/// `POST /notifications/tasks` — Notify the assignees of a task.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/tasks",
    tag = "Notifications",
    summary = "Notify task assignees",
    request_body = TaskAssignedRequest,
    responses(
        (status = 200, description = "Delivery attempted", body = DeliveryResponse),
        (status = 400, description = "Blank assignee identity"),
    )
)]
pub async fn task_assigned(
    State(state): State<AppState>,
    Json(req): Json<TaskAssignedRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let assignees = parse_user_ids(&req.assignees)?;
    let delivered = state
        .notifications
        .task_assigned(req.task_id, &req.title, &assignees)
        .await?;
    Ok(Json(DeliveryResponse { delivered }))
}

/// Notification routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications/products", post(product_created))
        .route("/notifications/tasks", post(task_assigned))
}
