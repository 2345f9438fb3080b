//! Domain layer: identities, the connection abstraction, and the registry.
//!
//! This module contains the server-side model of the real-time channel:
//! user and connection identifiers, the transport-agnostic
//! [`Connection`] trait, the [`ConnectionRegistry`] that owns every
//! user → connection association, and the typed notifications services
//! push through it.

pub mod connection;
pub mod connection_id;
pub mod connection_registry;
pub mod notification;
pub mod user_id;

pub use connection::{Connection, ConnectionError, ConnectionHandle};
pub use connection_id::ConnectionId;
pub use connection_registry::{ConnectionRegistry, DEFAULT_WRITE_TIMEOUT, RegistryStatus};
pub use notification::{Notification, Payload};
pub use user_id::UserId;
