//! WebSocket connection adapter and inbound read loop.
//!
//! [`WsConnection`] owns the write half of an upgraded socket and exposes
//! it to the registry as a [`Connection`]. [`run_connection`] owns the read
//! half: it registers the socket, routes client messages, and disconnects
//! once the peer goes away.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use futures_util::future::BoxFuture;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::Mutex;

use super::messages::InboundMessage;
use crate::domain::{Connection, ConnectionError, ConnectionId, ConnectionRegistry, UserId};

/// Write half of an axum WebSocket, registered as a [`Connection`].
pub struct WsConnection {
    id: ConnectionId,
    sink: Mutex<SplitSink<WebSocket, Message>>,
    closed: AtomicBool,
}

impl WsConnection {
    /// Wraps the write half of a freshly upgraded socket.
    #[must_use]
    pub fn new(sink: SplitSink<WebSocket, Message>) -> Self {
        Self {
            id: ConnectionId::new(),
            sink: Mutex::new(sink),
            closed: AtomicBool::new(false),
        }
    }
}

impl fmt::Debug for WsConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WsConnection")
            .field("id", &self.id)
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl Connection for WsConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn send_text(&self, text: Utf8Bytes) -> BoxFuture<'_, Result<(), ConnectionError>> {
        Box::pin(async move {
            if self.closed.load(Ordering::Acquire) {
                return Err(ConnectionError::Closed);
            }
            let mut sink = self.sink.lock().await;
            sink.send(Message::Text(text))
                .await
                .map_err(|e| ConnectionError::Transport(e.to_string()))
        })
    }

    fn close(&self) -> BoxFuture<'_, Result<(), ConnectionError>> {
        Box::pin(async move {
            if self.closed.swap(true, Ordering::AcqRel) {
                return Ok(());
            }
            let mut sink = self.sink.lock().await;
            sink.close()
                .await
                .map_err(|e| ConnectionError::Transport(e.to_string()))
        })
    }
}

/// Runs the lifetime of a single WebSocket connection.
///
/// - Registers the write half under `user_id`.
/// - Reads client frames and routes `direct` and `broadcast` messages.
/// - Disconnects on close frame, end of stream, or read error.
pub async fn run_connection(socket: WebSocket, user_id: UserId, registry: Arc<ConnectionRegistry>) {
    let (sink, mut stream) = socket.split();
    let connection = Arc::new(WsConnection::new(sink));

    let connection_id = match registry.connect(user_id.clone(), connection).await {
        Ok(id) => id,
        Err(err) => {
            tracing::warn!(%user_id, error = %err, "failed to register ws connection");
            return;
        }
    };

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                handle_text_message(&registry, &user_id, text.as_str()).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                tracing::debug!(%user_id, %connection_id, error = %err, "ws read failed");
                break;
            }
        }
    }

    registry.disconnect(connection_id).await;
    tracing::debug!(%user_id, %connection_id, "ws connection closed");
}

/// Routes one client text frame through the registry.
///
/// Malformed frames and unknown message types are logged and dropped; the
/// sender gets no reply and stays connected.
pub async fn handle_text_message(registry: &ConnectionRegistry, sender: &UserId, text: &str) {
    match InboundMessage::decode(text) {
        Ok(InboundMessage::Direct { to, payload }) => {
            match registry.send_to_user(&to, &payload).await {
                Ok(delivered) => tracing::debug!(%sender, recipient = %to, delivered, "direct message"),
                Err(err) => tracing::warn!(%sender, recipient = %to, error = %err, "direct message failed"),
            }
        }
        Ok(InboundMessage::Broadcast { payload }) => match registry.broadcast(&payload).await {
            Ok(delivered) => tracing::debug!(%sender, delivered, "broadcast message"),
            Err(err) => tracing::warn!(%sender, error = %err, "broadcast failed"),
        },
        Ok(InboundMessage::Unknown { kind }) => {
            tracing::warn!(%sender, ?kind, "unknown message type");
        }
        Err(err) => {
            tracing::warn!(%sender, error = %err, "invalid message");
        }
    }
}
