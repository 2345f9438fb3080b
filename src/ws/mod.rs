//! WebSocket layer: upgrade handling, the socket adapter, inbound routing.
//!
//! The WebSocket endpoint at `/ws?user_id=<id>` registers each socket in
//! the [`crate::domain::ConnectionRegistry`] and relays client `direct`
//! and `broadcast` messages through it.

pub mod connection;
pub mod handler;
pub mod messages;

pub use connection::WsConnection;
