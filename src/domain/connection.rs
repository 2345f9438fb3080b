//! Transport-agnostic connection handle.
//!
//! The registry only needs three capabilities from a live channel: a
//! stable identity, a way to write one text frame, and a way to close it.
//! [`crate::ws::WsConnection`] implements this for axum WebSockets; tests
//! use an in-memory double.

use std::fmt;
use std::sync::Arc;

use axum::extract::ws::Utf8Bytes;
use futures_util::future::BoxFuture;

use super::ConnectionId;

/// Shared handle to a registered connection.
pub type ConnectionHandle = Arc<dyn Connection>;

/// Failure writing to or closing a connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    /// The channel has already been closed by either side.
    #[error("connection closed")]
    Closed,

    /// The underlying transport reported an I/O or protocol error.
    #[error("transport error: {0}")]
    Transport(String),
}

/// A live bidirectional message channel with a peer.
///
/// Implementations must be cheap to share behind an [`Arc`] and safe to
/// call concurrently: the registry may write to the same connection from
/// several fan-out operations at once.
pub trait Connection: fmt::Debug + Send + Sync {
    /// Returns the stable identifier of this connection.
    fn id(&self) -> ConnectionId;

    /// Writes a single text frame.
    ///
    /// `text` is reference-counted; one encoded payload is shared by every
    /// recipient of a fan-out. The registry bounds this future with its
    /// write deadline, so implementations need not enforce one themselves.
    fn send_text(&self, text: Utf8Bytes) -> BoxFuture<'_, Result<(), ConnectionError>>;

    /// Closes the underlying channel.
    fn close(&self) -> BoxFuture<'_, Result<(), ConnectionError>>;
}
