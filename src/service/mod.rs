//! Service layer: application-facing notification publishing.
//!
//! [`NotificationService`] turns application events into real-time
//! messages and hands them to the [`super::domain::ConnectionRegistry`].

pub mod notification_service;

pub use notification_service::NotificationService;
