//! # taskhub-gateway
//!
//! Real-time notification gateway for the taskhub task-tracking backend.
//!
//! This crate keeps an in-memory registry of live WebSocket connections
//! per user identity and fans messages out to them: direct sends,
//! broadcasts, and multi-user pushes. Failed sockets are pruned as a side
//! effect of delivery. Application services reach the registry through
//! [`service::NotificationService`] or the REST endpoints.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket /ws, HTTP)
//!     │
//!     ├── WS Handler (ws/)
//!     ├── REST Handlers (api/)
//!     │
//!     ├── NotificationService (service/)
//!     │
//!     └── ConnectionRegistry (domain/)
//!             user_id → { Connection }
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod server;
pub mod service;
pub mod ws;

#[cfg(test)]
mod testutil;
