//! Real-time channel endpoints: introspection and raw payload delivery.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    DeliveryResponse, DirectDeliveryResponse, PayloadRequest, PushRequest, RealtimeStatusResponse,
};
use crate::app_state::AppState;
use crate::domain::UserId;
use crate::error::GatewayError;

/// `GET /realtime/status` — Online users and connection counts.
#[utoipa::path(
    get,
    path = "/api/v1/realtime/status",
    tag = "Realtime",
    summary = "Real-time channel status",
    description = "Point-in-time snapshot of online user identities and live connection counts.",
    responses(
        (status = 200, description = "Current registry state", body = RealtimeStatusResponse),
    )
)]
pub async fn realtime_status(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.registry.status().await;
    let online_users: Vec<String> = status.online_users.into_iter().map(String::from).collect();

    Json(RealtimeStatusResponse {
        online_user_count: online_users.len(),
        online_users,
        connection_count: status.connection_count,
    })
}

/// `POST /realtime/broadcast` — Send a payload to every connection.
#[utoipa::path(
    post,
    path = "/api/v1/realtime/broadcast",
    tag = "Realtime",
    summary = "Broadcast a payload",
    request_body = PayloadRequest,
    responses(
        (status = 200, description = "Broadcast attempted", body = DeliveryResponse),
    )
)]
pub async fn broadcast(
    State(state): State<AppState>,
    Json(req): Json<PayloadRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let delivered = state.notifications.broadcast(&req.payload).await?;
    Ok(Json(DeliveryResponse { delivered }))
}

/// `POST /realtime/users/{user_id}/messages` — Send a payload to one user.
#[utoipa::path(
    post,
    path = "/api/v1/realtime/users/{user_id}/messages",
    tag = "Realtime",
    summary = "Send a payload to one user",
    description = "Delivers to every live connection of the user. An offline user yields `delivered: 0`.",
    params(("user_id" = String, Path, description = "Target user identity")),
    request_body = PayloadRequest,
    responses(
        (status = 200, description = "Delivery attempted", body = DirectDeliveryResponse),
        (status = 400, description = "Blank user identity"),
    )
)]
pub async fn send_to_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<PayloadRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let user_id = UserId::parse(&user_id)?;
    let delivered = state.notifications.send_direct(&user_id, &req.payload).await?;
    Ok(Json(DirectDeliveryResponse {
        user_id: user_id.into(),
        delivered,
    }))
}

/// `POST /realtime/push` — Send a payload to several users.
#[utoipa::path(
    post,
    path = "/api/v1/realtime/push",
    tag = "Realtime",
    summary = "Push a payload to several users",
    request_body = PushRequest,
    responses(
        (status = 200, description = "Delivery attempted", body = DeliveryResponse),
        (status = 400, description = "Blank user identity in the recipient list"),
    )
)]
pub async fn push(
    State(state): State<AppState>,
    Json(req): Json<PushRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let user_ids = parse_user_ids(&req.user_ids)?;
    let delivered = state.notifications.push(&user_ids, &req.payload).await?;
    Ok(Json(DeliveryResponse { delivered }))
}

/// Validates a list of raw identities.
pub(crate) fn parse_user_ids(raw: &[String]) -> Result<Vec<UserId>, GatewayError> {
    raw.iter().map(|id| UserId::parse(id)).collect()
}

/// Real-time routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/realtime/status", get(realtime_status))
        .route("/realtime/broadcast", post(broadcast))
        .route("/realtime/users/{user_id}/messages", post(send_to_user))
        .route("/realtime/push", post(push))
}
