//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use super::connection::run_connection;
use crate::app_state::AppState;
use crate::domain::UserId;
use crate::error::GatewayError;

/// Query parameters accepted by `GET /ws`.
#[derive(Debug, Deserialize)]
pub struct WsConnectParams {
    /// Identity to register the connection under.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// `GET /ws?user_id=<id>` — Upgrade HTTP connection to WebSocket.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] if `user_id` is missing or
/// blank.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsConnectParams>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let user_id = UserId::parse(params.user_id.as_deref().unwrap_or_default())
        .map_err(|_| GatewayError::InvalidRequest("missing user_id parameter".to_string()))?;
    let registry = Arc::clone(&state.registry);
    tracing::debug!(%user_id, write_timeout = ?registry.write_timeout(), "upgrading websocket");

    Ok(ws
        .on_failed_upgrade(|err| tracing::warn!(error = %err, "websocket upgrade failed"))
        .on_upgrade(move |socket| run_connection(socket, user_id, registry)))
}
