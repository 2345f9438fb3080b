//! Server-originated notifications pushed over the real-time channel.
//!
//! Every variant serializes as a flat JSON object tagged by `"type"`, the
//! shape existing clients already parse.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Structured, string-keyed message payload.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Notification emitted by application services.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// A product was created; broadcast to everyone.
    NewProduct {
        /// Human-readable summary.
        message: String,
        /// Identifier of the created product.
        product_id: u64,
        /// Name of the created product.
        product_name: String,
        /// Unix timestamp (seconds) of the event.
        time: i64,
    },

    /// A task was assigned; pushed to each assignee.
    TaskAssigned {
        /// Human-readable summary.
        message: String,
        /// Identifier of the task.
        task_id: u64,
        /// Task title.
        title: String,
        /// Unix timestamp (seconds) of the event.
        time: i64,
    },
}

impl Notification {
    /// Builds a [`Notification::NewProduct`] stamped with `at`.
    #[must_use]
    pub fn new_product(product_id: u64, product_name: &str, at: DateTime<Utc>) -> Self {
        Self::NewProduct {
            message: format!("New product: {product_name}"),
            product_id,
            product_name: product_name.to_string(),
            time: at.timestamp(),
        }
    }

    /// Builds a [`Notification::TaskAssigned`] stamped with `at`.
    #[must_use]
    pub fn task_assigned(task_id: u64, title: &str, at: DateTime<Utc>) -> Self {
        Self::TaskAssigned {
            message: format!("New task assigned: {title}"),
            task_id,
            title: title.to_string(),
            time: at.timestamp(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn at() -> DateTime<Utc> {
        let Some(ts) = Utc.timestamp_opt(1_700_000_000, 0).single() else {
            panic!("valid timestamp");
        };
        ts
    }

    #[test]
    fn new_product_wire_shape() {
        let n = Notification::new_product(7, "Widget", at());
        let Ok(value) = serde_json::to_value(&n) else {
            panic!("serialization failed");
        };
        assert_eq!(
            value,
            json!({
                "type": "new_product",
                "message": "New product: Widget",
                "product_id": 7,
                "product_name": "Widget",
                "time": 1_700_000_000,
            })
        );
    }

    #[test]
    fn task_assigned_wire_shape() {
        let n = Notification::task_assigned(3, "Review PR", at());
        let Ok(value) = serde_json::to_value(&n) else {
            panic!("serialization failed");
        };
        assert_eq!(value.get("type"), Some(&json!("task_assigned")));
        assert_eq!(value.get("task_id"), Some(&json!(3)));
        assert_eq!(value.get("title"), Some(&json!("Review PR")));
    }
}
