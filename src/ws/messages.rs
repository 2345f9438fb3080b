//! Client-sent WebSocket messages.
//!
//! Clients send JSON objects carrying a `type` discriminator. The whole
//! object is forwarded unchanged, so decoding only validates the routing
//! fields and keeps the original map.

use crate::domain::{Payload, UserId};

/// A decoded inbound frame, ready for routing.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// `{"type": "direct", "to": "<user_id>", ...}`: forward to one user.
    Direct {
        /// Recipient identity.
        to: UserId,
        /// Original payload, forwarded as-is.
        payload: Payload,
    },
    /// `{"type": "broadcast", ...}`: forward to every connection.
    Broadcast {
        /// Original payload, forwarded as-is.
        payload: Payload,
    },
    /// Any other `type`, or none at all.
    Unknown {
        /// The `type` value if it was a string.
        kind: Option<String>,
    },
}

/// Why an inbound frame could not be routed.
#[derive(Debug, thiserror::Error)]
pub enum InboundError {
    /// The frame was not valid JSON.
    #[error("malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// The frame was JSON but not an object.
    #[error("payload must be a JSON object")]
    NotAnObject,

    /// A direct message did not name a valid recipient.
    #[error("direct message requires a non-empty string `to` field")]
    MissingRecipient,
}

impl InboundMessage {
    /// Decodes a text frame.
    ///
    /// # Errors
    ///
    /// Returns an [`InboundError`] if the frame is not a JSON object or is
    /// a `direct` message without a usable `to` field.
    pub fn decode(text: &str) -> Result<Self, InboundError> {
        let serde_json::Value::Object(payload) = serde_json::from_str::<serde_json::Value>(text)?
        else {
            return Err(InboundError::NotAnObject);
        };

        match payload.get("type").and_then(serde_json::Value::as_str) {
            Some("direct") => {
                let to = payload
                    .get("to")
                    .and_then(serde_json::Value::as_str)
                    .and_then(|raw| UserId::parse(raw).ok())
                    .ok_or(InboundError::MissingRecipient)?;
                Ok(Self::Direct { to, payload })
            }
            Some("broadcast") => Ok(Self::Broadcast { payload }),
            other => Ok(Self::Unknown {
                kind: other.map(str::to_string),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn decodes_direct_with_original_payload() {
        let Ok(msg) = InboundMessage::decode(r#"{"type":"direct","to":"u2","body":"hi"}"#) else {
            panic!("should decode");
        };
        let InboundMessage::Direct { to, payload } = msg else {
            panic!("expected direct, got {msg:?}");
        };
        assert_eq!(to.as_str(), "u2");
        assert_eq!(payload.get("body").and_then(|v| v.as_str()), Some("hi"));
        assert_eq!(payload.len(), 3);
    }

    #[test]
    fn decodes_broadcast() {
        let Ok(msg) = InboundMessage::decode(r#"{"type":"broadcast","body":"all"}"#) else {
            panic!("should decode");
        };
        assert!(matches!(msg, InboundMessage::Broadcast { .. }));
    }

    #[test]
    fn unknown_type_is_not_an_error() {
        let Ok(msg) = InboundMessage::decode(r#"{"type":"typing"}"#) else {
            panic!("should decode");
        };
        assert_eq!(
            msg,
            InboundMessage::Unknown {
                kind: Some("typing".to_string())
            }
        );

        let Ok(msg) = InboundMessage::decode(r#"{"body":"no type"}"#) else {
            panic!("should decode");
        };
        assert_eq!(msg, InboundMessage::Unknown { kind: None });
    }

    #[test]
    fn direct_without_recipient_is_rejected() {
        for text in [
            r#"{"type":"direct"}"#,
            r#"{"type":"direct","to":""}"#,
            r#"{"type":"direct","to":42}"#,
        ] {
            assert!(matches!(
                InboundMessage::decode(text),
                Err(InboundError::MissingRecipient)
            ));
        }
    }

    #[test]
    fn malformed_and_non_object_frames_are_rejected() {
        assert!(matches!(
            InboundMessage::decode("{not json"),
            Err(InboundError::MalformedJson(_))
        ));
        assert!(matches!(
            InboundMessage::decode("[1,2,3]"),
            Err(InboundError::NotAnObject)
        ));
    }
}
