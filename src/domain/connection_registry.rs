//! Process-wide map from user identity to live connections.
//!
//! [`ConnectionRegistry`] owns every user → connection association. All
//! structural changes take the write half of a single
//! [`tokio::sync::RwLock`]; fan-out operations take the read half only long
//! enough to copy the target handles, then write to the sockets with the
//! lock released. Connections whose write fails or exceeds the deadline are
//! disconnected after the send loop, never while the snapshot lock is held.

use std::collections::HashMap;
use std::time::Duration;

use axum::extract::ws::Utf8Bytes;
use futures_util::future::join_all;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::connection::ConnectionHandle;
use super::{ConnectionId, UserId};
use crate::error::GatewayError;

/// Deadline applied to each outbound frame when none is configured.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Primary map plus the reverse index, always mutated together.
#[derive(Debug, Default)]
struct Connections {
    by_user: HashMap<UserId, HashMap<ConnectionId, ConnectionHandle>>,
    owners: HashMap<ConnectionId, UserId>,
}

impl Connections {
    fn total(&self) -> usize {
        self.by_user.values().map(HashMap::len).sum()
    }

    /// Removes a connection, dropping the user entry once its set is empty.
    fn remove(&mut self, connection_id: ConnectionId) -> Option<(UserId, ConnectionHandle)> {
        let user_id = self.owners.remove(&connection_id)?;
        let set = self.by_user.get_mut(&user_id)?;
        let handle = set.remove(&connection_id)?;
        if set.is_empty() {
            self.by_user.remove(&user_id);
        }
        Some((user_id, handle))
    }
}

/// Consistent view of the registry taken under a single read guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStatus {
    /// Users with at least one live connection, sorted.
    pub online_users: Vec<UserId>,
    /// Total number of live connections across all users.
    pub connection_count: usize,
}

/// In-memory registry of live connections keyed by user identity.
///
/// Construct one per process and share it as `Arc<ConnectionRegistry>`.
///
/// # Concurrency
///
/// - `connect` and `disconnect` are serialized by the write lock.
/// - Snapshots for delivery and introspection share the read lock and copy
///   handles out before any I/O happens.
/// - A stalled peer can hold up a fan-out call for at most the write
///   deadline; it never blocks unrelated connects or disconnects.
#[derive(Debug)]
pub struct ConnectionRegistry {
    inner: RwLock<Connections>,
    write_timeout: Duration,
}

impl ConnectionRegistry {
    /// Creates an empty registry with [`DEFAULT_WRITE_TIMEOUT`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_write_timeout(DEFAULT_WRITE_TIMEOUT)
    }

    /// Creates an empty registry with a custom per-write deadline.
    #[must_use]
    pub fn with_write_timeout(write_timeout: Duration) -> Self {
        Self {
            inner: RwLock::new(Connections::default()),
            write_timeout,
        }
    }

    /// Returns the deadline applied to each outbound write.
    #[must_use]
    pub const fn write_timeout(&self) -> Duration {
        self.write_timeout
    }

    /// Registers `connection` under `user_id`, creating the entry if absent.
    ///
    /// Registering the same connection twice under the same user is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConnectionAlreadyRegistered`] if the
    /// connection is currently registered under a different user. A
    /// connection must be disconnected before it can move.
    pub async fn connect(
        &self,
        user_id: UserId,
        connection: ConnectionHandle,
    ) -> Result<ConnectionId, GatewayError> {
        let connection_id = connection.id();
        let mut inner = self.inner.write().await;

        if let Some(owner) = inner.owners.get(&connection_id) {
            if *owner == user_id {
                return Ok(connection_id);
            }
            return Err(GatewayError::ConnectionAlreadyRegistered {
                connection_id,
                owner: owner.clone(),
            });
        }

        inner.owners.insert(connection_id, user_id.clone());
        inner
            .by_user
            .entry(user_id.clone())
            .or_default()
            .insert(connection_id, connection);
        let total = inner.total();
        drop(inner);

        info!(%user_id, %connection_id, total, "user connected");
        Ok(connection_id)
    }

    /// Unregisters a connection and closes it.
    ///
    /// Returns `true` if the connection was registered. Unknown or already
    /// removed connections are a no-op. Only the call that removes the
    /// handle closes the channel, so each registration is closed once.
    pub async fn disconnect(&self, connection_id: ConnectionId) -> bool {
        let (removed, total) = {
            let mut inner = self.inner.write().await;
            let removed = inner.remove(connection_id);
            (removed, inner.total())
        };

        let Some((user_id, handle)) = removed else {
            return false;
        };

        match tokio::time::timeout(self.write_timeout, handle.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => debug!(%user_id, %connection_id, error = %err, "close failed"),
            Err(_) => debug!(%user_id, %connection_id, "close timed out"),
        }

        info!(%user_id, %connection_id, total, "user disconnected");
        true
    }

    /// Delivers `message` to every connection of `user_id`.
    ///
    /// Returns the number of connections that accepted the frame. An
    /// unknown user yields `Ok(0)` without touching the registry.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Serialization`] if `message` cannot be
    /// encoded; nothing is sent in that case.
    pub async fn send_to_user<T>(
        &self,
        user_id: &UserId,
        message: &T,
    ) -> Result<usize, GatewayError>
    where
        T: Serialize + ?Sized,
    {
        let targets = self.snapshot_user(user_id).await;
        if targets.is_empty() {
            return Ok(0);
        }

        let frame = encode(message)?;
        debug!(%user_id, recipients = targets.len(), "sending message to user");
        Ok(self.deliver(&targets, &frame).await)
    }

    /// Delivers `message` to every registered connection.
    ///
    /// Returns the number of connections that accepted the frame.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Serialization`] if `message` cannot be
    /// encoded; nothing is sent in that case.
    pub async fn broadcast<T>(&self, message: &T) -> Result<usize, GatewayError>
    where
        T: Serialize + ?Sized,
    {
        let targets = self.snapshot_all().await;
        let frame = encode(message)?;
        debug!(recipients = targets.len(), "broadcasting message");
        Ok(self.deliver(&targets, &frame).await)
    }

    /// Delivers `message` to each listed user independently.
    ///
    /// A dead or unknown recipient does not affect delivery to the others.
    /// Returns the total number of frames accepted across all users.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Serialization`] if `message` cannot be
    /// encoded; nothing is sent in that case.
    pub async fn push_to_users<T>(
        &self,
        user_ids: &[UserId],
        message: &T,
    ) -> Result<usize, GatewayError>
    where
        T: Serialize + ?Sized,
    {
        let frame = encode(message)?;
        let mut delivered = 0usize;
        for user_id in user_ids {
            let targets = self.snapshot_user(user_id).await;
            if targets.is_empty() {
                continue;
            }
            delivered = delivered.saturating_add(self.deliver(&targets, &frame).await);
        }
        Ok(delivered)
    }

    /// Returns a snapshot of all user identities with at least one
    /// connection. Order is unspecified.
    pub async fn online_users(&self) -> Vec<UserId> {
        self.inner.read().await.by_user.keys().cloned().collect()
    }

    /// Returns the total number of registered connections across all users.
    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.total()
    }

    /// Returns the online users and the connection count as of one instant.
    ///
    /// Unlike calling [`Self::online_users`] and [`Self::connection_count`]
    /// back to back, no connect or disconnect can land between the two.
    pub async fn status(&self) -> RegistryStatus {
        let inner = self.inner.read().await;
        let mut online_users: Vec<UserId> = inner.by_user.keys().cloned().collect();
        let connection_count = inner.total();
        drop(inner);

        online_users.sort_unstable();
        RegistryStatus {
            online_users,
            connection_count,
        }
    }

    /// Returns the number of connections registered for `user_id`.
    pub async fn user_connection_count(&self, user_id: &UserId) -> usize {
        self.inner
            .read()
            .await
            .by_user
            .get(user_id)
            .map_or(0, HashMap::len)
    }

    /// Returns `true` if `user_id` has at least one registered connection.
    pub async fn is_online(&self, user_id: &UserId) -> bool {
        self.inner.read().await.by_user.contains_key(user_id)
    }

    /// Returns the ids of the connections registered for `user_id`.
    pub async fn connections_of(&self, user_id: &UserId) -> Vec<ConnectionId> {
        self.inner
            .read()
            .await
            .by_user
            .get(user_id)
            .map(|set| set.keys().copied().collect())
            .unwrap_or_default()
    }

    async fn snapshot_user(&self, user_id: &UserId) -> Vec<ConnectionHandle> {
        let inner = self.inner.read().await;
        inner
            .by_user
            .get(user_id)
            .map(|set| set.values().cloned().collect())
            .unwrap_or_default()
    }

    async fn snapshot_all(&self) -> Vec<ConnectionHandle> {
        let inner = self.inner.read().await;
        inner
            .by_user
            .values()
            .flat_map(HashMap::values)
            .cloned()
            .collect()
    }

    /// Writes `frame` to every target concurrently and prunes the ones
    /// that failed. Must be called without holding `inner`.
    async fn deliver(&self, targets: &[ConnectionHandle], frame: &Utf8Bytes) -> usize {
        let write_timeout = self.write_timeout;
        let outcomes = join_all(targets.iter().map(|conn| async move {
            let connection_id = conn.id();
            match tokio::time::timeout(write_timeout, conn.send_text(frame.clone())).await {
                Ok(Ok(())) => (connection_id, true),
                Ok(Err(err)) => {
                    warn!(%connection_id, error = %err, "write failed, dropping connection");
                    (connection_id, false)
                }
                Err(_) => {
                    warn!(%connection_id, timeout = ?write_timeout, "write deadline exceeded, dropping connection");
                    (connection_id, false)
                }
            }
        }))
        .await;

        let mut delivered = 0usize;
        let mut dead = Vec::new();
        for (connection_id, ok) in outcomes {
            if ok {
                delivered = delivered.saturating_add(1);
            } else {
                dead.push(connection_id);
            }
        }

        for connection_id in dead {
            self.disconnect(connection_id).await;
        }
        delivered
    }
}

/// Serializes `message` once into a shareable text frame.
fn encode<T>(message: &T) -> Result<Utf8Bytes, GatewayError>
where
    T: Serialize + ?Sized,
{
    Ok(Utf8Bytes::from(serde_json::to_string(message)?))
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
